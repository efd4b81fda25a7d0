//! Wires settings into runnable analyses

use crate::agents::AgentTaskRunner;
use crate::graph::validate_order;
use crate::ticker::validate_ticker;
use crate::{
    AnalysisMode, AnalysisRun, AnalysisTaskGraph, ArtifactWriter, BatchSummary, Result, RunExecutor,
    Settings, TickerOutcome,
};
use chrono::Local;
use std::sync::Arc;
use stockcrew_llm::LlmResolver;
use stockcrew_market::{MarketDataAggregator, RecordCache};
use stockcrew_runtime::AgentRuntime;
use stockcrew_search::SearchResolver;
use tracing::{error, info, instrument};

/// Runs analyses for one ticker or a batch of them
pub struct Orchestrator {
    graph: AnalysisTaskGraph,
    executor: RunExecutor,
}

impl Orchestrator {
    pub fn new(graph: AnalysisTaskGraph, executor: RunExecutor) -> Self {
        Self { graph, executor }
    }

    /// Build the production pipeline
    ///
    /// The language model is resolved here, so a missing LLM provider fails
    /// before any analysis starts.
    ///
    /// # Errors
    ///
    /// Returns an error if no language model can be resolved or a market data
    /// source cannot be built.
    pub fn from_settings(settings: &Settings, model: Option<&str>) -> Result<Self> {
        let llm = LlmResolver::new(Arc::clone(&settings.llm)).resolve(model)?;
        info!(provider = %llm.provider, model = %llm.model, "Language model resolved");

        let runtime = AgentRuntime::builder()
            .llm(llm)
            .max_execution_time(settings.app.max_execution_time)
            .build()?;

        let search = SearchResolver::new(Arc::clone(&settings.search));
        let mut market = MarketDataAggregator::from_registry(&settings.market)?;
        if settings.app.cache_enabled {
            market = market.with_cache(RecordCache::new(settings.app.cache_ttl));
        }

        let runner = AgentTaskRunner::new(Arc::new(runtime), Arc::new(search), Arc::new(market));
        let executor = RunExecutor::new(Arc::new(runner), ArtifactWriter::new(&settings.app.reports_dir))
            .parallel(settings.app.parallel_tasks);

        Ok(Self::new(AnalysisTaskGraph::new(&settings.app.reports_dir), executor))
    }

    /// Analyse one ticker
    ///
    /// # Errors
    ///
    /// Fails only when the run cannot start; task failures are recorded on
    /// the returned run.
    #[instrument(skip(self))]
    pub async fn run(&self, ticker: &str, mode: AnalysisMode) -> Result<AnalysisRun> {
        let ticker = validate_ticker(ticker)?;
        let started = Local::now();
        let tasks = self.graph.build_for(mode, &ticker, started.naive_local());
        validate_order(&tasks)?;

        info!(ticker = %ticker, mode = %mode, tasks = tasks.len(), "Starting analysis");
        let run = AnalysisRun::new(ticker, mode, tasks).with_started_at(started);
        let run = self.executor.execute(run).await?;
        info!(
            ticker = %run.ticker,
            success = run.is_success(),
            done = run.count(crate::TaskStatus::Done),
            "Analysis finished"
        );
        Ok(run)
    }

    /// Analyse every ticker in turn; one ticker's failure never stops the rest
    pub async fn run_batch(&self, tickers: &[String], mode: AnalysisMode) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for (index, ticker) in tickers.iter().enumerate() {
            info!(ticker = %ticker, position = index + 1, total = tickers.len(), "Batch item");
            let outcome = match self.run(ticker, mode).await {
                Ok(run) => TickerOutcome::from_run(&run),
                Err(e) => {
                    error!(ticker = %ticker, error = %e, "Analysis could not start");
                    TickerOutcome::aborted(ticker.as_str(), e)
                }
            };
            summary.push(outcome);
        }
        info!(succeeded = summary.succeeded(), failed = summary.failed(), "Batch finished");
        summary
    }
}
