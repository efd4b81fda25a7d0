//! Agent step events
//!
//! While an agent works it reports what it is doing as a sequence of
//! [`AgentStep`] values. Observers decide what to do with them; the default
//! one writes them to the log.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Maximum observation length written by [`LoggingStepObserver`]
pub const OBSERVATION_LOG_LIMIT: usize = 200;

/// One step taken by an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStep {
    /// Role of the agent that took the step
    pub role: String,
    /// What the agent did (e.g. "completion")
    pub action: String,
    /// Input the step operated on
    pub input: String,
    /// Result of the step, when the step produced one
    pub observation: Option<String>,
}

impl AgentStep {
    pub fn new(
        role: impl Into<String>,
        action: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            action: action.into(),
            input: input.into(),
            observation: None,
        }
    }

    pub fn with_observation(mut self, observation: impl Into<String>) -> Self {
        self.observation = Some(observation.into());
        self
    }

    pub fn has_observation(&self) -> bool {
        self.observation.is_some()
    }
}

/// Receives agent steps as they happen
pub trait StepObserver: Send + Sync {
    fn on_step(&self, step: &AgentStep);
}

impl<F> StepObserver for F
where
    F: Fn(&AgentStep) + Send + Sync,
{
    fn on_step(&self, step: &AgentStep) {
        self(step);
    }
}

/// Logs every step at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingStepObserver;

impl StepObserver for LoggingStepObserver {
    fn on_step(&self, step: &AgentStep) {
        match &step.observation {
            Some(observation) => info!(
                role = %step.role,
                action = %step.action,
                input = %truncate(&step.input, OBSERVATION_LOG_LIMIT),
                observation = %truncate(observation, OBSERVATION_LOG_LIMIT),
                "Agent step"
            ),
            None => info!(
                role = %step.role,
                action = %step.action,
                input = %truncate(&step.input, OBSERVATION_LOG_LIMIT),
                "Agent step"
            ),
        }
    }
}

/// Cut `text` to at most `limit` characters, marking the cut with "..."
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
