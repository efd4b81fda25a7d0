//! Single-completion agent

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use stockcrew_core::{Agent, AgentStep, Context, Error, Result, StepObserver};
use stockcrew_llm::ClientHandle;
use tracing::{debug, instrument};

/// Configuration for a simple agent
#[derive(Debug, Clone)]
pub struct SimpleConfig {
    /// Role name reported in step events (e.g. "Technical Analyst")
    pub role: String,

    /// System prompt
    pub system_prompt: String,

    /// Upper bound for one `process` call
    pub max_execution_time: Duration,
}

impl Default for SimpleConfig {
    fn default() -> Self {
        Self {
            role: "Analyst".to_string(),
            system_prompt: "You are a financial analyst.".to_string(),
            max_execution_time: Duration::from_secs(1800),
        }
    }
}

/// An agent that answers with one LLM completion
///
/// Emits a `start` step before calling the model and a `completion` step
/// carrying the answer as its observation.
pub struct SimpleAgent {
    llm: ClientHandle,
    config: SimpleConfig,
    observer: Arc<dyn StepObserver>,
    name: String,
}

impl SimpleAgent {
    pub fn new(
        llm: ClientHandle,
        config: SimpleConfig,
        observer: Arc<dyn StepObserver>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            config,
            observer,
            name: name.into(),
        }
    }

    pub fn config(&self) -> &SimpleConfig {
        &self.config
    }
}

#[async_trait]
impl Agent for SimpleAgent {
    #[instrument(skip(self, input, context), fields(agent = %self.name, task = context.task().unwrap_or("-")))]
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        self.observer
            .on_step(&AgentStep::new(&self.config.role, "start", input.as_str()));

        let call = self
            .llm
            .complete(Some(self.config.system_prompt.as_str()), input.as_str());
        let response = tokio::time::timeout(self.config.max_execution_time, call)
            .await
            .map_err(|_| Error::Timeout(self.config.max_execution_time.as_secs()))?
            .map_err(|e| Error::ProcessingFailed(e.to_string()))?;

        debug!(tokens = response.usage.total(), "Completion received");

        let text = response.text().trim().to_string();
        if text.is_empty() {
            return Err(Error::ProcessingFailed(format!(
                "{} returned an empty response",
                self.llm.provider
            )));
        }

        self.observer.on_step(
            &AgentStep::new(&self.config.role, "completion", input).with_observation(text.as_str()),
        );
        Ok(text)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
