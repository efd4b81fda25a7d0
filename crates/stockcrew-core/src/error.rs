//! Error types for stockcrew-core

use crate::registry::ProviderKind;
use stockcrew_utils::ConfigError;
use thiserror::Error;

/// Result type alias for stockcrew-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// Agent processing failed
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),

    /// The agent did not finish within its execution limit
    #[error("Agent timed out after {0} seconds")]
    Timeout(u64),
}

/// Error raised while loading or querying a provider registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// No provider of this kind is configured at all
    #[error("No {kind} provider configured")]
    NoProviderConfigured { kind: ProviderKind },

    /// The named provider is not configured (usually a missing credential)
    #[error("{kind} provider '{identity}' is not available")]
    ProviderUnavailable { kind: ProviderKind, identity: String },

    /// A provider setting could not be read
    #[error(transparent)]
    Config(#[from] ConfigError),
}
