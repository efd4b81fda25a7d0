//! Task runner backed by LLM analyst agents

use crate::prompts::build_prompt;
use crate::{AgentRole, TaskError, TaskInput, TaskKind, TaskRunner};
use async_trait::async_trait;
use std::sync::Arc;
use stockcrew_core::{Agent, Context};
use stockcrew_market::MarketDataAggregator;
use stockcrew_runtime::{AgentRuntime, SimpleAgent, SimpleConfig};
use stockcrew_search::SearchResolver;
use tracing::{debug, instrument};

/// Runs each task with a single-completion agent playing the task's role
///
/// Research gathers market data and web search results; the analyst tasks
/// after it see the same record, taken from the run's shared cell, plus
/// their predecessors' reports.
pub struct AgentTaskRunner {
    runtime: Arc<AgentRuntime>,
    search: Arc<SearchResolver>,
    market: Arc<MarketDataAggregator>,
}

impl AgentTaskRunner {
    pub fn new(runtime: Arc<AgentRuntime>, search: Arc<SearchResolver>, market: Arc<MarketDataAggregator>) -> Self {
        Self {
            runtime,
            search,
            market,
        }
    }

    fn agent(&self, role: AgentRole, task: TaskKind) -> SimpleAgent {
        let config = SimpleConfig {
            role: role.title().to_string(),
            system_prompt: role.system_prompt(),
            max_execution_time: role.max_execution_time(),
        };
        self.runtime.create_simple_agent(config, task.as_str())
    }

    /// Digest of the run's market data, fetching it on first use
    async fn market_context(&self, input: &TaskInput) -> Result<String, TaskError> {
        let record = input
            .market
            .get_or_init(|| self.market.fetch(&input.ticker))
            .await;
        if record.is_empty() {
            return Err(TaskError::NoData(input.ticker.clone()));
        }
        Ok(record.context_summary())
    }

    async fn prompt(&self, input: &TaskInput) -> Result<String, TaskError> {
        let prompt = match input.task {
            TaskKind::Research => {
                let market = self.market_context(input).await?;
                let query = format!("{} stock news results outlook", input.ticker);
                let search = self.search.search(&query, None).await;
                debug!(provider = ?search.provider, simulated = search.simulated, "Search context ready");
                build_prompt(input, Some(&market), Some(&search.to_context_text()))
            }
            TaskKind::Fundamental | TaskKind::Technical => {
                input.require(TaskKind::Research)?;
                let market = self.market_context(input).await?;
                build_prompt(input, Some(&market), None)
            }
            TaskKind::DayTrader => {
                input.require(TaskKind::Technical)?;
                let market = self.market_context(input).await?;
                build_prompt(input, Some(&market), None)
            }
            TaskKind::Final => {
                input.require(TaskKind::Research)?;
                build_prompt(input, None, None)
            }
        };
        Ok(prompt)
    }
}

#[async_trait]
impl TaskRunner for AgentTaskRunner {
    #[instrument(skip(self, input), fields(ticker = %input.ticker, task = %input.task))]
    async fn run(&self, input: &TaskInput) -> Result<String, TaskError> {
        let prompt = self.prompt(input).await?;
        let agent = self.agent(input.role, input.task);
        let mut context = Context::new()
            .with_ticker(input.ticker.as_str())
            .with_mode(input.mode.as_str())
            .with_task(input.task.as_str())
            .with_run_id(input.run_id.to_string());
        Ok(agent.process(prompt, &mut context).await?)
    }
}
