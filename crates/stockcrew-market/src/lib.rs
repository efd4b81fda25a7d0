//! Market data for stockcrew
//!
//! Three sources feed one [`FinancialRecord`] per ticker, in strict
//! precedence order:
//!
//! 1. Alpha Vantage over MCP ([`DataSource::Mcp`])
//! 2. Alpha Vantage REST ([`DataSource::AlphaVantage`])
//! 3. Yahoo Finance ([`DataSource::MarketDataBase`])
//!
//! The first source that returns data populates the whole record; fields from
//! lower-precedence sources are never mixed in. [`cross_validate`] compares two
//! sources for diagnostics only.

pub mod aggregator;
pub mod cache;
pub mod error;
pub mod record;
pub mod retry;
pub mod source;
pub mod sources;
pub mod validation;

pub use aggregator::MarketDataAggregator;
pub use cache::RecordCache;
pub use error::{MarketError, Result};
pub use record::{
    CompanyOverview, DividendHistory, DividendPayment, FinancialRecord, FinancialStatements, PriceBar, SourceData,
};
pub use retry::RetryPolicy;
pub use source::{DataSource, MarketDataSource, alpha_vantage_symbol};
pub use validation::{MatchStatus, MetricComparison, SourceComparison, cross_validate};

/// Market data source registry
pub type MarketRegistry = stockcrew_core::ProviderRegistry<DataSource>;
