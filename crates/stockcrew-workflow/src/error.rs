//! Error types for analysis workflows

use crate::{TaskKind, TaskStatus};
use serde::Serialize;
use stockcrew_core::RegistryError;
use stockcrew_llm::LLMError;
use stockcrew_market::MarketError;
use stockcrew_utils::ConfigError;
use thiserror::Error;

/// Result type for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Errors that stop a run (or a whole invocation) from starting
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Invalid analysis mode '{0}' (expected complete, quick, technical or fundamental)")]
    InvalidMode(String),

    #[error("Invalid ticker symbol '{0}'")]
    InvalidSymbol(String),

    #[error("Task {task} cannot go from {from} to {to}")]
    InvalidTransition {
        task: TaskKind,
        from: TaskStatus,
        to: TaskStatus,
    },

    #[error("Task {task} is ordered before its predecessor {predecessor}")]
    DependencyOrder { task: TaskKind, predecessor: TaskKind },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Agent(#[from] stockcrew_core::Error),

    #[error(transparent)]
    Llm(#[from] LLMError),

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Why a single task ended `Failed`
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TaskError {
    #[error("Agent failed: {0}")]
    Agent(String),

    #[error("Task timed out after {0}s")]
    Timeout(u64),

    #[error("Missing output of predecessor {0}")]
    MissingInput(TaskKind),

    #[error("No market data for {0}")]
    NoData(String),

    #[error("Could not write report: {0}")]
    Artifact(String),
}

impl From<stockcrew_core::Error> for TaskError {
    fn from(err: stockcrew_core::Error) -> Self {
        match err {
            stockcrew_core::Error::Timeout(secs) => Self::Timeout(secs),
            other => Self::Agent(other.to_string()),
        }
    }
}
