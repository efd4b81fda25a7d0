//! The seam between the executor and whatever produces task output

use crate::{AgentRole, AnalysisMode, TaskError, TaskKind};
use async_trait::async_trait;
use std::sync::Arc;
use stockcrew_market::FinancialRecord;
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Market data for one run, fetched by whichever task needs it first
pub type SharedMarketData = Arc<OnceCell<FinancialRecord>>;

/// Everything a runner gets to produce one task's report
#[derive(Debug, Clone)]
pub struct TaskInput {
    pub run_id: Uuid,
    pub ticker: String,
    pub mode: AnalysisMode,
    pub task: TaskKind,
    pub role: AgentRole,
    /// Reports of the task's predecessors, in declaration order
    pub predecessor_outputs: Vec<(TaskKind, String)>,
    /// Same cell for every task of the run
    pub market: SharedMarketData,
}

impl TaskInput {
    pub fn predecessor_output(&self, kind: TaskKind) -> Option<&str> {
        self.predecessor_outputs
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, output)| output.as_str())
    }

    /// Output of a predecessor the task cannot work without
    pub fn require(&self, kind: TaskKind) -> Result<&str, TaskError> {
        self.predecessor_output(kind)
            .ok_or(TaskError::MissingInput(kind))
    }
}

/// Produces the report text for one task
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRunner: Send + Sync {
    async fn run(&self, input: &TaskInput) -> Result<String, TaskError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_missing_predecessor() {
        let input = TaskInput {
            run_id: Uuid::nil(),
            ticker: "X".to_string(),
            mode: AnalysisMode::Complete,
            task: TaskKind::DayTrader,
            role: AgentRole::DayTradeConsultant,
            predecessor_outputs: vec![(TaskKind::Research, "facts".to_string())],
            market: SharedMarketData::default(),
        };
        assert_eq!(input.require(TaskKind::Research), Ok("facts"));
        assert_eq!(
            input.require(TaskKind::Technical),
            Err(TaskError::MissingInput(TaskKind::Technical))
        );
    }
}
