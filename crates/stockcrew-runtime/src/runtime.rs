//! Runtime holding the shared resources agents are built from

use crate::agents::{SimpleAgent, SimpleConfig};
use std::sync::Arc;
use std::time::Duration;
use stockcrew_core::{Error, LoggingStepObserver, Result, StepObserver};
use stockcrew_llm::ClientHandle;

/// Configuration for the agent runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Ceiling applied to every agent's own execution limit
    pub max_execution_time: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_execution_time: Duration::from_secs(1800),
        }
    }
}

/// Runtime for creating agents
///
/// # Example
///
/// ```no_run
/// use stockcrew_runtime::{AgentRuntime, SimpleConfig};
///
/// # fn example(llm: stockcrew_llm::ClientHandle) -> stockcrew_core::Result<()> {
/// let runtime = AgentRuntime::builder().llm(llm).build()?;
/// let agent = runtime.create_simple_agent(SimpleConfig::default(), "analyst");
/// # Ok(())
/// # }
/// ```
pub struct AgentRuntime {
    llm: ClientHandle,
    observer: Arc<dyn StepObserver>,
    config: RuntimeConfig,
}

impl AgentRuntime {
    pub fn new(llm: ClientHandle, observer: Arc<dyn StepObserver>, config: RuntimeConfig) -> Self {
        Self {
            llm,
            observer,
            config,
        }
    }

    pub fn builder() -> AgentRuntimeBuilder {
        AgentRuntimeBuilder::new()
    }

    pub fn llm(&self) -> &ClientHandle {
        &self.llm
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Create a single-completion agent
    ///
    /// The agent's execution limit is capped by the runtime's.
    pub fn create_simple_agent(&self, mut config: SimpleConfig, name: impl Into<String>) -> SimpleAgent {
        config.max_execution_time = config.max_execution_time.min(self.config.max_execution_time);
        SimpleAgent::new(self.llm.clone(), config, Arc::clone(&self.observer), name)
    }
}

/// Builder for AgentRuntime
pub struct AgentRuntimeBuilder {
    llm: Option<ClientHandle>,
    observer: Option<Arc<dyn StepObserver>>,
    config: RuntimeConfig,
}

impl AgentRuntimeBuilder {
    pub fn new() -> Self {
        Self {
            llm: None,
            observer: None,
            config: RuntimeConfig::default(),
        }
    }

    /// Set the language-model client
    pub fn llm(mut self, llm: ClientHandle) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Set the step observer (defaults to logging)
    pub fn observer(mut self, observer: Arc<dyn StepObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn max_execution_time(mut self, limit: Duration) -> Self {
        self.config.max_execution_time = limit;
        self
    }

    /// Build the runtime
    ///
    /// # Errors
    ///
    /// Returns an error if the language-model client is not set
    pub fn build(self) -> Result<AgentRuntime> {
        let llm = self
            .llm
            .ok_or_else(|| Error::Generic("Language model client not set".to_string()))?;
        let observer = self
            .observer
            .unwrap_or_else(|| Arc::new(LoggingStepObserver));

        Ok(AgentRuntime::new(llm, observer, self.config))
    }
}

impl Default for AgentRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
