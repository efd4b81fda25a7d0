//! Agent runtime for stockcrew
//!
//! The [`AgentRuntime`] holds the resolved language-model client and the step
//! observer, and hands out [`SimpleAgent`]s configured for a role.

pub mod agents;
pub mod runtime;

pub use agents::{SimpleAgent, SimpleConfig};
pub use runtime::{AgentRuntime, AgentRuntimeBuilder, RuntimeConfig};
