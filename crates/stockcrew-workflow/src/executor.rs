//! Runs a task list to completion

use crate::graph::waves;
use crate::{AnalysisRun, ArtifactWriter, Result, SharedMarketData, TaskError, TaskInput, TaskKind, TaskRunner};
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Drives an [`AnalysisRun`] through its tasks
///
/// A task starts only once every predecessor is `Done`; a task whose
/// predecessor failed or was skipped is itself skipped. Each finished task
/// writes its own report file, so concurrent siblings share nothing but the
/// run's market data, which is fetched at most once.
pub struct RunExecutor {
    runner: Arc<dyn TaskRunner>,
    writer: ArtifactWriter,
    parallel: bool,
}

impl RunExecutor {
    pub fn new(runner: Arc<dyn TaskRunner>, writer: ArtifactWriter) -> Self {
        Self {
            runner,
            writer,
            parallel: false,
        }
    }

    /// Run tasks whose predecessors are all done concurrently
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Execute every task of `run`
    ///
    /// Task failures are recorded on the run, not returned.
    #[instrument(skip(self, run), fields(ticker = %run.ticker, mode = %run.mode, run_id = %run.run_id))]
    pub async fn execute(&self, mut run: AnalysisRun) -> Result<AnalysisRun> {
        let waves: Vec<Vec<TaskKind>> = if self.parallel {
            waves(run.tasks())
        } else {
            run.tasks().iter().map(|t| vec![t.kind]).collect()
        };
        let market = SharedMarketData::default();

        for wave in waves {
            let mut pending = Vec::new();
            for kind in wave {
                if let Some(blocker) = run.blocking_predecessor(kind) {
                    warn!(task = %kind, predecessor = %blocker, "Skipping task: predecessor did not finish");
                    run.skip(kind)?;
                    continue;
                }
                run.start(kind)?;
                pending.push(self.prepare(&run, kind, &market));
            }

            let results = join_all(pending.into_iter().map(|(input, path)| self.run_task(input, path))).await;
            for (kind, result) in results {
                match result {
                    Ok(output) => {
                        info!(task = %kind, "Task done");
                        run.complete(kind, output)?;
                    }
                    Err(error) => {
                        warn!(task = %kind, error = %error, "Task failed");
                        run.fail(kind, error)?;
                    }
                }
            }
        }

        if let Err(e) = self.writer.write_execution_log(&run).await {
            warn!(error = %e, "Could not write execution log");
        }
        Ok(run)
    }

    fn prepare(&self, run: &AnalysisRun, kind: TaskKind, market: &SharedMarketData) -> (TaskInput, PathBuf) {
        let task = run.task(kind);
        let input = TaskInput {
            run_id: run.run_id,
            ticker: run.ticker.clone(),
            mode: run.mode,
            task: kind,
            role: kind.role(),
            predecessor_outputs: run.predecessor_outputs(kind),
            market: Arc::clone(market),
        };
        let path = task.map(|t| t.output_path.clone()).unwrap_or_default();
        (input, path)
    }

    async fn run_task(&self, input: TaskInput, path: PathBuf) -> (TaskKind, std::result::Result<String, TaskError>) {
        let kind = input.task;
        info!(task = %kind, role = %input.role, "Task started");
        let result = match self.runner.run(&input).await {
            Ok(output) => self
                .writer
                .write_report(&path, &output)
                .await
                .map(|()| output)
                .map_err(|e| TaskError::Artifact(e.to_string())),
            Err(error) => Err(error),
        };
        (kind, result)
    }
}
