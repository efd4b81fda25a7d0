//! Concrete LLM provider implementations

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(any(feature = "openai", feature = "ollama"))]
pub mod openai;

#[cfg(feature = "anthropic")]
pub use anthropic::{AnthropicConfig, AnthropicProvider};

#[cfg(any(feature = "openai", feature = "ollama"))]
pub use openai::{OpenAIConfig, OpenAIProvider};

#[cfg(any(feature = "anthropic", feature = "openai", feature = "ollama"))]
pub(crate) fn map_status_error(status: reqwest::StatusCode, body: String, model: String) -> crate::LLMError {
    match status.as_u16() {
        401 | 403 => crate::LLMError::AuthenticationFailed,
        429 => crate::LLMError::RateLimitExceeded(body),
        400 => crate::LLMError::InvalidRequest(body),
        404 => crate::LLMError::ModelNotFound(model),
        _ => crate::LLMError::RequestFailed(format!("HTTP {status}: {body}")),
    }
}
