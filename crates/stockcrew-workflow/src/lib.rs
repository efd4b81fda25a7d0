//! Analysis workflows for stockcrew
//!
//! A run analyses one ticker at a chosen depth ([`AnalysisMode`]). The
//! [`AnalysisTaskGraph`] turns the mode into dependency-ordered
//! [`AnalysisTask`]s, the [`RunExecutor`] drives each task through its
//! [`TaskStatus`] lifecycle with a [`TaskRunner`], and every finished task
//! leaves a Markdown report behind.
//!
//! [`Orchestrator`] wires the production pieces together from [`Settings`].

pub mod agents;
pub mod artifacts;
pub mod batch;
pub mod error;
pub mod executor;
pub mod graph;
pub mod orchestrator;
pub mod prompts;
pub mod roles;
pub mod run;
pub mod runner;
pub mod settings;
pub mod task;
pub mod ticker;

pub use agents::AgentTaskRunner;
pub use artifacts::ArtifactWriter;
pub use batch::{BatchSummary, TickerOutcome};
pub use error::{Result, TaskError, WorkflowError};
pub use executor::RunExecutor;
pub use graph::AnalysisTaskGraph;
pub use orchestrator::Orchestrator;
pub use roles::AgentRole;
pub use run::{AnalysisRun, TaskStatus};
pub use runner::{SharedMarketData, TaskInput, TaskRunner};
pub use settings::{ConfigSummary, ProviderSummary, Settings, ValidationReport};
pub use task::{AnalysisMode, AnalysisTask, TaskKind};
pub use ticker::{POPULAR_SYMBOLS, normalize_interactive, validate_ticker};
