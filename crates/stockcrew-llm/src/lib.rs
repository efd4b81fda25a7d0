//! Language-model layer for stockcrew
//!
//! This crate provides:
//!
//! - Message and completion types shared by every backend
//! - The [`LLMProvider`] trait and concrete HTTP clients (behind feature flags)
//! - [`LlmProviderId`], the language-model identities known to the registry
//! - [`LlmResolver`], which turns a configured provider into a ready
//!   [`ClientHandle`] without touching the network

pub mod completion;
pub mod error;
pub mod identity;
pub mod messages;
pub mod provider;
pub mod resolver;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use identity::{LlmProviderId, normalize_model};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
pub use resolver::{BuildClient, ClientHandle, ClientSettings, ClientStrategy, LlmResolver};

/// Language-model registry
pub type LlmRegistry = stockcrew_core::ProviderRegistry<LlmProviderId>;

// Provider implementations (feature-gated)
#[cfg(any(feature = "anthropic", feature = "openai", feature = "ollama"))]
pub mod providers;
