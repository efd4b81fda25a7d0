//! Agent roles and their standing instructions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The five analyst personas of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    ResearchAnalyst,
    FundamentalAnalyst,
    TechnicalAnalyst,
    DayTradeConsultant,
    InvestmentConsultant,
}

impl AgentRole {
    pub fn title(&self) -> &'static str {
        match self {
            Self::ResearchAnalyst => "Research Analyst",
            Self::FundamentalAnalyst => "Fundamental Analyst",
            Self::TechnicalAnalyst => "Technical Analyst",
            Self::DayTradeConsultant => "Day Trade Consultant",
            Self::InvestmentConsultant => "Investment Consultant",
        }
    }

    pub fn goal(&self) -> &'static str {
        match self {
            Self::ResearchAnalyst => {
                "Collect, cross-check and interpret market data and news so the rest of the team works from solid facts."
            }
            Self::FundamentalAnalyst => {
                "Judge the company's financial health and intrinsic value from its statements, ratios and sector context."
            }
            Self::TechnicalAnalyst => {
                "Identify trend, momentum, support and resistance, and the best entry and exit points from price action."
            }
            Self::DayTradeConsultant => {
                "Turn the technical picture into a concrete intraday plan with entries, targets, stops and position sizing."
            }
            Self::InvestmentConsultant => {
                "Combine every analysis into one clear, risk-aware investment recommendation."
            }
        }
    }

    pub fn backstory(&self) -> &'static str {
        match self {
            Self::ResearchAnalyst => {
                "You have spent fifteen years researching Brazilian and global equities for institutional clients. \
                 You validate every fact in more than one source and always give historical context."
            }
            Self::FundamentalAnalyst => {
                "You are a CFA charterholder who has valued hundreds of B3-listed companies. \
                 You read financial statements line by line and distrust numbers you cannot reconcile."
            }
            Self::TechnicalAnalyst => {
                "You are a CMT who has traded the Brazilian market through several cycles. \
                 You confirm every signal across indicators and timeframes before acting on it."
            }
            Self::DayTradeConsultant => {
                "You run a professional intraday desk. Discipline and risk management matter more to you than any single trade."
            }
            Self::InvestmentConsultant => {
                "You advise long-term investors and family offices. Your recommendations weigh return against risk and state both plainly."
            }
        }
    }

    /// Execution ceiling for one task handled by this role
    pub fn max_execution_time(&self) -> Duration {
        match self {
            Self::DayTradeConsultant => Duration::from_secs(1200),
            Self::InvestmentConsultant => Duration::from_secs(2400),
            _ => Duration::from_secs(1800),
        }
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "You are a {}.\n\nGoal: {}\n\nBackground: {}\n\n\
             Write your answer as a Markdown report. Base every claim on the data provided; \
             when information is missing or simulated, say so instead of inventing figures.",
            self.title(),
            self.goal(),
            self.backstory()
        )
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_trade_is_faster() {
        assert!(AgentRole::DayTradeConsultant.max_execution_time() < AgentRole::ResearchAnalyst.max_execution_time());
    }

    #[test]
    fn test_system_prompt_names_role() {
        let prompt = AgentRole::TechnicalAnalyst.system_prompt();
        assert!(prompt.starts_with("You are a Technical Analyst."));
        assert!(prompt.contains("Markdown"));
    }
}
