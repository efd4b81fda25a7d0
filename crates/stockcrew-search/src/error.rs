//! Error types for web search

use stockcrew_core::RegistryError;
use thiserror::Error;

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while searching
#[derive(Error, Debug)]
pub enum SearchError {
    /// Provider not configured or no backend registered for it
    #[error("Search provider '{0}' is not available")]
    ProviderUnavailable(String),

    /// Network failure, non-2xx status, or malformed payload
    #[error("Search with {provider} failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    /// Provider answered but returned nothing for the query
    #[error("Search with {provider} returned no results")]
    NoResults { provider: String },

    /// Every provider failed and no simulated fallback was requested
    #[error("All search providers failed: {0}")]
    AllSourcesExhausted(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl SearchError {
    pub(crate) fn request_failed(provider: impl ToString, reason: impl ToString) -> Self {
        Self::RequestFailed {
            provider: provider.to_string(),
            reason: reason.to_string(),
        }
    }
}
