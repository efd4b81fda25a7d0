//! Per-ticker outcomes of a batch

use crate::{AnalysisRun, TaskStatus};
use serde::Serialize;
use std::path::PathBuf;

/// How one ticker's run ended
#[derive(Debug, Clone, Serialize)]
pub struct TickerOutcome {
    pub ticker: String,
    pub success: bool,
    pub tasks_done: usize,
    pub tasks_total: usize,
    /// Reports actually written
    pub reports: Vec<PathBuf>,
    pub error: Option<String>,
}

impl TickerOutcome {
    pub fn from_run(run: &AnalysisRun) -> Self {
        let reports = run
            .tasks()
            .iter()
            .filter(|t| run.status(t.kind) == Some(TaskStatus::Done))
            .map(|t| t.output_path.clone())
            .collect();
        let error = (!run.is_success()).then(|| {
            let problems: Vec<String> = run
                .tasks()
                .iter()
                .filter_map(|t| run.error(t.kind).map(|e| format!("{}: {e}", t.kind)))
                .collect();
            if problems.is_empty() {
                "tasks did not complete".to_string()
            } else {
                problems.join("; ")
            }
        });

        Self {
            ticker: run.ticker.clone(),
            success: run.is_success(),
            tasks_done: run.count(TaskStatus::Done),
            tasks_total: run.tasks().len(),
            reports,
            error,
        }
    }

    /// The run never started
    pub fn aborted(ticker: impl Into<String>, error: impl ToString) -> Self {
        Self {
            ticker: ticker.into(),
            success: false,
            tasks_done: 0,
            tasks_total: 0,
            reports: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Result of analysing several tickers
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub outcomes: Vec<TickerOutcome>,
}

impl BatchSummary {
    pub fn push(&mut self, outcome: TickerOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn outcome(&self, ticker: &str) -> Option<&TickerOutcome> {
        self.outcomes.iter().find(|o| o.ticker == ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnalysisMode, AnalysisTaskGraph, TaskError, TaskKind};
    use chrono::Local;

    #[test]
    fn test_counts() {
        let mut summary = BatchSummary::default();
        summary.push(TickerOutcome::aborted("BAD TICKER", "Invalid ticker symbol"));

        let tasks = AnalysisTaskGraph::new("r").build_for(AnalysisMode::Technical, "GOOD", Local::now().naive_local());
        let mut run = AnalysisRun::new("GOOD", AnalysisMode::Technical, tasks);
        for kind in [TaskKind::Research, TaskKind::Technical] {
            run.start(kind).unwrap();
            run.complete(kind, String::new()).unwrap();
        }
        summary.push(TickerOutcome::from_run(&run));

        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 1);
        let good = summary.outcome("GOOD").unwrap();
        assert_eq!(good.reports.len(), 2);
        assert!(good.error.is_none());
    }

    #[test]
    fn test_failed_run_lists_errors() {
        let tasks = AnalysisTaskGraph::new("r").build_for(AnalysisMode::Fundamental, "AAA", Local::now().naive_local());
        let mut run = AnalysisRun::new("AAA", AnalysisMode::Fundamental, tasks);
        run.start(TaskKind::Research).unwrap();
        run.fail(TaskKind::Research, TaskError::NoData("AAA".to_string())).unwrap();
        run.skip(TaskKind::Fundamental).unwrap();

        let outcome = TickerOutcome::from_run(&run);
        assert!(!outcome.success);
        assert_eq!(outcome.tasks_done, 0);
        assert_eq!(outcome.error.as_deref(), Some("research: No market data for AAA"));
    }
}
