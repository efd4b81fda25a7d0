//! Analysis tasks and modes

use crate::WorkflowError;
use crate::roles::AgentRole;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The five analysis steps, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Research,
    Fundamental,
    Technical,
    #[serde(rename = "daytrader")]
    DayTrader,
    Final,
}

impl TaskKind {
    pub const ALL: [Self; 5] = [
        Self::Research,
        Self::Fundamental,
        Self::Technical,
        Self::DayTrader,
        Self::Final,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Fundamental => "fundamental",
            Self::Technical => "technical",
            Self::DayTrader => "daytrader",
            Self::Final => "final",
        }
    }

    /// Every task this one consumes output from, before mode filtering
    pub fn predecessors(&self) -> &'static [Self] {
        match self {
            Self::Research => &[],
            Self::Fundamental | Self::Technical => &[Self::Research],
            Self::DayTrader => &[Self::Research, Self::Technical],
            Self::Final => &[Self::Research, Self::Fundamental, Self::Technical, Self::DayTrader],
        }
    }

    /// Report file name stem
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Final => "final_recommendation",
            other => other.as_str(),
        }
    }

    pub fn role(&self) -> AgentRole {
        match self {
            Self::Research => AgentRole::ResearchAnalyst,
            Self::Fundamental => AgentRole::FundamentalAnalyst,
            Self::Technical => AgentRole::TechnicalAnalyst,
            Self::DayTrader => AgentRole::DayTradeConsultant,
            Self::Final => AgentRole::InvestmentConsultant,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analysis depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Complete,
    Quick,
    Technical,
    Fundamental,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Quick => "quick",
            Self::Technical => "technical",
            Self::Fundamental => "fundamental",
        }
    }

    /// Tasks selected for this mode, in declaration order
    pub fn tasks(&self) -> &'static [TaskKind] {
        use TaskKind::{DayTrader, Final, Fundamental, Research, Technical};
        match self {
            Self::Complete => &[Research, Fundamental, Technical, DayTrader, Final],
            Self::Quick => &[Research, Fundamental, Technical, Final],
            Self::Technical => &[Research, Technical],
            Self::Fundamental => &[Research, Fundamental],
        }
    }
}

impl FromStr for AnalysisMode {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "complete" => Ok(Self::Complete),
            "quick" => Ok(Self::Quick),
            "technical" | "technical-only" => Ok(Self::Technical),
            "fundamental" | "fundamental-only" => Ok(Self::Fundamental),
            _ => Err(WorkflowError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a run's task graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisTask {
    pub kind: TaskKind,
    /// Predecessors present in this run, in declaration order
    pub predecessors: Vec<TaskKind>,
    pub role: AgentRole,
    pub output_path: PathBuf,
}
