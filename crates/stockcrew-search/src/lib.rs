//! Web search for stockcrew
//!
//! [`SearchResolver`] runs a query against the configured search backends in
//! fallback order and, when every backend fails, answers with a deterministic
//! simulated result set. Search failures never reach the caller as errors.

pub mod backend;
pub mod backends;
pub mod error;
pub mod identity;
pub mod resolver;
pub mod stub;
pub mod types;

pub use backend::SearchBackend;
pub use error::{Result, SearchError};
pub use identity::SearchProviderId;
pub use resolver::SearchResolver;
pub use types::{SearchHit, SearchOutcome};

/// Search provider registry
pub type SearchRegistry = stockcrew_core::ProviderRegistry<SearchProviderId>;
