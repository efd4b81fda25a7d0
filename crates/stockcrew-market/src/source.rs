//! Market data source identities and the fetch abstraction

use crate::{Result, SourceData};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use stockcrew_core::{ExtraKey, ProviderIdentity, ProviderKind, ProviderSpec};

const MCP_EXTRAS: &[ExtraKey] = &[ExtraKey::optional("RETRIES", Some("3"))];

const ALPHA_VANTAGE_EXTRAS: &[ExtraKey] = &[
    ExtraKey::optional("PREMIUM", Some("false")),
    ExtraKey::optional("RATE_LIMIT", Some("5")),
];

/// Market data sources, in precedence order
///
/// The string form doubles as the `primary_source` tag of a
/// [`FinancialRecord`](crate::FinancialRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Alpha Vantage through its Model Context Protocol endpoint
    Mcp,
    /// Alpha Vantage REST API, enabled with `ALPHA_VANTAGE_ENABLED`
    AlphaVantage,
    /// Yahoo Finance quotes
    MarketDataBase,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProviderIdentity for DataSource {
    const KIND: ProviderKind = ProviderKind::MarketData;
    const ALL: &'static [Self] = &[Self::Mcp, Self::AlphaVantage, Self::MarketDataBase];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Mcp => "mcp",
            Self::AlphaVantage => "alpha_vantage",
            Self::MarketDataBase => "market_data_base",
        }
    }

    fn spec(&self) -> ProviderSpec {
        match self {
            Self::Mcp => ProviderSpec {
                credential_prefix: Some("ALPHA_VANTAGE"),
                enabled_by_default: true,
                default_base_url: Some("https://mcp.alphavantage.co"),
                default_timeout_secs: 30,
                extra_keys: MCP_EXTRAS,
                ..ProviderSpec::credentialed("ALPHA_VANTAGE_MCP")
            },
            Self::AlphaVantage => ProviderSpec {
                enabled_by_default: false,
                default_base_url: Some("https://www.alphavantage.co/query"),
                default_timeout_secs: 30,
                extra_keys: ALPHA_VANTAGE_EXTRAS,
                ..ProviderSpec::credentialed("ALPHA_VANTAGE")
            },
            Self::MarketDataBase => ProviderSpec {
                enabled_by_default: true,
                default_timeout_secs: 30,
                ..ProviderSpec::keyless("YAHOO")
            },
        }
    }
}

/// Symbol as Alpha Vantage expects it (B3 `.SA` suffix removed)
pub fn alpha_vantage_symbol(symbol: &str) -> &str {
    symbol.strip_suffix(".SA").unwrap_or(symbol)
}

/// One market data backend
///
/// A source that answers but has nothing for the symbol returns
/// [`MarketError::NoDataForSymbol`](crate::MarketError::NoDataForSymbol)
/// rather than an empty [`SourceData`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    fn source(&self) -> DataSource;

    async fn fetch(&self, symbol: &str) -> Result<SourceData>;
}
