//! Per-run task state

use crate::{AnalysisMode, AnalysisTask, Result, TaskError, TaskKind, WorkflowError};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Lifecycle of one task within a run
///
/// `Pending -> Running -> {Done | Failed}`, or `Pending -> Skipped` when a
/// predecessor did not finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Done,
    Failed,
    Skipped,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::Skipped)
    }

    fn can_become(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Running | Self::Skipped) | (Self::Running, Self::Done | Self::Failed)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Done => "done",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        };
        f.write_str(label)
    }
}

/// One analysis of one ticker
///
/// Owned by whoever drives it; nothing here is shared across runs.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRun {
    pub run_id: Uuid,
    pub ticker: String,
    pub mode: AnalysisMode,
    pub started_at: DateTime<Local>,
    tasks: Vec<AnalysisTask>,
    status: BTreeMap<TaskKind, TaskStatus>,
    outputs: BTreeMap<TaskKind, String>,
    errors: BTreeMap<TaskKind, TaskError>,
}

impl AnalysisRun {
    pub fn new(ticker: impl Into<String>, mode: AnalysisMode, tasks: Vec<AnalysisTask>) -> Self {
        let status = tasks.iter().map(|t| (t.kind, TaskStatus::Pending)).collect();
        Self {
            run_id: Uuid::new_v4(),
            ticker: ticker.into(),
            mode,
            started_at: Local::now(),
            tasks,
            status,
            outputs: BTreeMap::new(),
            errors: BTreeMap::new(),
        }
    }

    /// Use the same start time the task report paths were stamped with
    pub fn with_started_at(mut self, started_at: DateTime<Local>) -> Self {
        self.started_at = started_at;
        self
    }

    pub fn tasks(&self) -> &[AnalysisTask] {
        &self.tasks
    }

    pub fn task(&self, kind: TaskKind) -> Option<&AnalysisTask> {
        self.tasks.iter().find(|t| t.kind == kind)
    }

    pub fn status(&self, kind: TaskKind) -> Option<TaskStatus> {
        self.status.get(&kind).copied()
    }

    pub fn output(&self, kind: TaskKind) -> Option<&str> {
        self.outputs.get(&kind).map(String::as_str)
    }

    pub fn error(&self, kind: TaskKind) -> Option<&TaskError> {
        self.errors.get(&kind)
    }

    fn transition(&mut self, kind: TaskKind, next: TaskStatus) -> Result<()> {
        let current = self.status.get_mut(&kind).ok_or(WorkflowError::InvalidTransition {
            task: kind,
            from: TaskStatus::Pending,
            to: next,
        })?;
        if !current.can_become(next) {
            return Err(WorkflowError::InvalidTransition {
                task: kind,
                from: *current,
                to: next,
            });
        }
        *current = next;
        Ok(())
    }

    pub fn start(&mut self, kind: TaskKind) -> Result<()> {
        self.transition(kind, TaskStatus::Running)
    }

    pub fn complete(&mut self, kind: TaskKind, output: String) -> Result<()> {
        self.transition(kind, TaskStatus::Done)?;
        self.outputs.insert(kind, output);
        Ok(())
    }

    pub fn fail(&mut self, kind: TaskKind, error: TaskError) -> Result<()> {
        self.transition(kind, TaskStatus::Failed)?;
        self.errors.insert(kind, error);
        Ok(())
    }

    pub fn skip(&mut self, kind: TaskKind) -> Result<()> {
        self.transition(kind, TaskStatus::Skipped)
    }

    /// First predecessor of `kind` that has not reached `Done`
    pub fn blocking_predecessor(&self, kind: TaskKind) -> Option<TaskKind> {
        self.task(kind)?
            .predecessors
            .iter()
            .copied()
            .find(|p| self.status(*p) != Some(TaskStatus::Done))
    }

    /// Outputs of `kind`'s predecessors, in declaration order
    pub fn predecessor_outputs(&self, kind: TaskKind) -> Vec<(TaskKind, String)> {
        self.task(kind)
            .map(|task| {
                task.predecessors
                    .iter()
                    .filter_map(|p| self.outputs.get(p).map(|o| (*p, o.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        self.status.values().filter(|s| **s == status).count()
    }

    pub fn is_finished(&self) -> bool {
        self.status.values().all(TaskStatus::is_terminal)
    }

    /// Every task reached `Done`
    pub fn is_success(&self) -> bool {
        self.status.values().all(|s| *s == TaskStatus::Done)
    }

    /// One line per task, in task order
    pub fn status_lines(&self) -> Vec<String> {
        self.tasks
            .iter()
            .map(|task| {
                let status = self.status(task.kind).unwrap_or(TaskStatus::Pending);
                match self.errors.get(&task.kind) {
                    Some(error) => format!("{}: {status} ({error})", task.kind),
                    None => format!("{}: {status}", task.kind),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnalysisTaskGraph;

    fn run(mode: AnalysisMode) -> AnalysisRun {
        let tasks = AnalysisTaskGraph::new("reports").build_for(mode, "PETR4.SA", Local::now().naive_local());
        AnalysisRun::new("PETR4.SA", mode, tasks)
    }

    #[test]
    fn test_new_run_is_pending() {
        let run = run(AnalysisMode::Quick);
        assert_eq!(run.count(TaskStatus::Pending), 4);
        assert!(!run.is_finished());
        assert!(!run.is_success());
    }

    #[test]
    fn test_lifecycle() {
        let mut run = run(AnalysisMode::Technical);
        run.start(TaskKind::Research).unwrap();
        run.complete(TaskKind::Research, "facts".to_string()).unwrap();
        assert_eq!(run.blocking_predecessor(TaskKind::Technical), None);

        run.start(TaskKind::Technical).unwrap();
        run.complete(TaskKind::Technical, "chart".to_string()).unwrap();

        assert!(run.is_success());
        assert_eq!(
            run.predecessor_outputs(TaskKind::Technical),
            vec![(TaskKind::Research, "facts".to_string())]
        );
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut run = run(AnalysisMode::Technical);
        run.start(TaskKind::Research).unwrap();
        run.fail(TaskKind::Research, TaskError::Timeout(1800)).unwrap();

        let err = run.start(TaskKind::Research).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvalidTransition {
                from: TaskStatus::Failed,
                to: TaskStatus::Running,
                ..
            }
        ));
    }

    #[test]
    fn test_cannot_finish_without_running() {
        let mut run = run(AnalysisMode::Technical);
        assert!(run.complete(TaskKind::Research, String::new()).is_err());
        assert!(run.start(TaskKind::DayTrader).is_err());
    }

    #[test]
    fn test_status_lines_include_errors() {
        let mut run = run(AnalysisMode::Technical);
        run.start(TaskKind::Research).unwrap();
        run.fail(TaskKind::Research, TaskError::NoData("PETR4.SA".to_string())).unwrap();
        assert_eq!(run.blocking_predecessor(TaskKind::Technical), Some(TaskKind::Research));
        run.skip(TaskKind::Technical).unwrap();

        assert_eq!(
            run.status_lines(),
            vec![
                "research: failed (No market data for PETR4.SA)".to_string(),
                "technical: skipped".to_string(),
            ]
        );
        assert!(run.is_finished());
    }
}
