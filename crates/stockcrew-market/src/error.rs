//! Error types for market data

use stockcrew_utils::ConfigError;
use thiserror::Error;

/// Result type for market data operations
pub type Result<T> = std::result::Result<T, MarketError>;

/// Errors that can occur while fetching market data
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Market data source '{0}' is not available")]
    ProviderUnavailable(String),

    #[error("Request to {source_name} failed: {reason}")]
    RequestFailed { source_name: String, reason: String },

    #[error("{source_name} has no data for {symbol}")]
    NoDataForSymbol { source_name: String, symbol: String },

    #[error("Rate limit exceeded for {0}")]
    RateLimitExceeded(String),

    #[error("MCP error {code}: {message}")]
    Mcp { code: i64, message: String },

    #[error("All market data sources failed: {0}")]
    AllSourcesExhausted(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MarketError {
    pub(crate) fn request_failed(source_name: impl ToString, reason: impl ToString) -> Self {
        Self::RequestFailed {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn no_data(source_name: impl ToString, symbol: &str) -> Self {
        Self::NoDataForSymbol {
            source_name: source_name.to_string(),
            symbol: symbol.to_string(),
        }
    }

    /// Transient failures worth another attempt against the same source
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RequestFailed { .. } | Self::Http(_))
    }
}
