//! Error types for LLM operations

use stockcrew_core::RegistryError;
use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LLMError {
    /// API request failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP error
    #[cfg(feature = "reqwest")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// No client-construction strategy is registered for the provider
    #[error("Unsupported language model provider: {0}")]
    UnsupportedProvider(String),

    /// The provider's client was compiled out
    #[error("Provider '{provider}' requires the '{feature}' feature of stockcrew-llm")]
    MissingDependency {
        provider: String,
        feature: &'static str,
    },

    /// Provider lookup failed
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
