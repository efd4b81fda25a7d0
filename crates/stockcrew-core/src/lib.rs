//! Core abstractions for stockcrew
//!
//! This crate defines the fundamental traits and types shared by every other
//! stockcrew crate: the [`Agent`] trait and its [`Context`], the
//! [`AgentStep`] event emitted while agents work, and the generic
//! [`ProviderRegistry`] that discovers interchangeable backends
//! (language models, search, market data) from configuration.

pub mod agent;
pub mod context;
pub mod error;
pub mod fallback;
pub mod registry;
pub mod step;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, RegistryError, Result};
pub use fallback::{ChainExhausted, ChainSuccess, FailedAttempt, first_success};
pub use registry::{
    ExtraKey, ProviderConfig, ProviderIdentity, ProviderKind, ProviderRegistry, ProviderSpec,
};
pub use step::{AgentStep, LoggingStepObserver, StepObserver};
