//! Task graph construction

use crate::artifacts::report_path;
use crate::{AnalysisMode, AnalysisTask, Result, TaskKind, WorkflowError};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Builds the dependency-ordered task list of a run
#[derive(Debug, Clone)]
pub struct AnalysisTaskGraph {
    reports_dir: PathBuf,
}

impl AnalysisTaskGraph {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Tasks for `mode` (a mode name such as `"quick"`) and `ticker`
    pub fn build(&self, mode: &str, ticker: &str) -> Result<Vec<AnalysisTask>> {
        let mode: AnalysisMode = mode.parse()?;
        Ok(self.build_for(mode, ticker, chrono::Local::now().naive_local()))
    }

    /// Tasks for `mode`, with report paths stamped at `started`
    ///
    /// Order is declaration order filtered to the mode's subset; each task's
    /// predecessors are restricted to tasks present in that subset.
    pub fn build_for(&self, mode: AnalysisMode, ticker: &str, started: NaiveDateTime) -> Vec<AnalysisTask> {
        let selected = mode.tasks();
        selected
            .iter()
            .map(|&kind| AnalysisTask {
                kind,
                predecessors: kind
                    .predecessors()
                    .iter()
                    .copied()
                    .filter(|p| selected.contains(p))
                    .collect(),
                role: kind.role(),
                output_path: report_path(&self.reports_dir, kind, ticker, started),
            })
            .collect()
    }
}

/// Check that no task appears before one of its predecessors
pub fn validate_order(tasks: &[AnalysisTask]) -> Result<()> {
    for (index, task) in tasks.iter().enumerate() {
        for &predecessor in &task.predecessors {
            if predecessor == task.kind {
                return Err(WorkflowError::DependencyOrder {
                    task: task.kind,
                    predecessor,
                });
            }
            let earlier = tasks[..index].iter().any(|t| t.kind == predecessor);
            if !earlier {
                return Err(WorkflowError::DependencyOrder {
                    task: task.kind,
                    predecessor,
                });
            }
        }
    }
    Ok(())
}

/// Group tasks into waves whose members only depend on earlier waves
pub fn waves(tasks: &[AnalysisTask]) -> Vec<Vec<TaskKind>> {
    let mut placed: Vec<TaskKind> = Vec::new();
    let mut waves = Vec::new();
    while placed.len() < tasks.len() {
        let wave: Vec<TaskKind> = tasks
            .iter()
            .filter(|t| !placed.contains(&t.kind))
            .filter(|t| t.predecessors.iter().all(|p| placed.contains(p)))
            .map(|t| t.kind)
            .collect();
        if wave.is_empty() {
            break;
        }
        placed.extend(&wave);
        waves.push(wave);
    }
    waves
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn started() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 18)
            .and_then(|d| d.and_hms_opt(12, 7, 0))
            .unwrap()
    }

    fn kinds(tasks: &[AnalysisTask]) -> Vec<TaskKind> {
        tasks.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_every_mode_is_topologically_ordered() {
        let graph = AnalysisTaskGraph::new("reports");
        for mode in ["complete", "quick", "technical", "fundamental"] {
            let tasks = graph.build(mode, "PETR4.SA").unwrap();
            validate_order(&tasks).unwrap();
            let present = kinds(&tasks);
            for task in &tasks {
                assert!(task.predecessors.iter().all(|p| present.contains(p)));
            }
        }
    }

    #[test]
    fn test_quick_final_predecessors() {
        let tasks = AnalysisTaskGraph::new("reports").build_for(AnalysisMode::Quick, "X", started());
        assert_eq!(
            kinds(&tasks),
            vec![TaskKind::Research, TaskKind::Fundamental, TaskKind::Technical, TaskKind::Final]
        );
        let last = tasks.last().unwrap();
        assert_eq!(
            last.predecessors,
            vec![TaskKind::Research, TaskKind::Fundamental, TaskKind::Technical]
        );
    }

    #[test]
    fn test_technical_mode_has_no_final() {
        let tasks = AnalysisTaskGraph::new("reports").build_for(AnalysisMode::Technical, "X", started());
        assert_eq!(kinds(&tasks), vec![TaskKind::Research, TaskKind::Technical]);
    }

    #[test]
    fn test_invalid_mode() {
        let err = AnalysisTaskGraph::new("reports").build("bogus", "X").unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidMode(_)));
    }

    #[test]
    fn test_output_paths() {
        let tasks = AnalysisTaskGraph::new("out").build_for(AnalysisMode::Fundamental, "PETR4.SA", started());
        assert_eq!(
            tasks[1].output_path,
            PathBuf::from("out/fundamental_PETR4.SA_20250918_1207.md")
        );
    }

    #[test]
    fn test_validate_order_rejects_reversed() {
        let mut tasks = AnalysisTaskGraph::new("r").build_for(AnalysisMode::Technical, "X", started());
        tasks.reverse();
        assert!(matches!(
            validate_order(&tasks),
            Err(WorkflowError::DependencyOrder {
                task: TaskKind::Technical,
                predecessor: TaskKind::Research
            })
        ));
    }

    #[test]
    fn test_waves_of_complete_run() {
        let tasks = AnalysisTaskGraph::new("r").build_for(AnalysisMode::Complete, "X", started());
        assert_eq!(
            waves(&tasks),
            vec![
                vec![TaskKind::Research],
                vec![TaskKind::Fundamental, TaskKind::Technical],
                vec![TaskKind::DayTrader],
                vec![TaskKind::Final],
            ]
        );
    }
}
