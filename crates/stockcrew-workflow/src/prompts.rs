//! Task prompts handed to the analyst agents

use crate::{TaskInput, TaskKind};
use std::fmt::Write;

fn instructions(kind: TaskKind) -> &'static str {
    match kind {
        TaskKind::Research => {
            "Produce a research brief: business overview, recent news and events, sector context, \
             and the key figures in the market data below. Point out where sources disagree or data is missing."
        }
        TaskKind::Fundamental => {
            "Assess valuation (P/E, PEG, P/B, EV/EBITDA), profitability (ROE, ROA, margins), \
             financial health and growth. Conclude with an estimate of fair value and a fundamental rating."
        }
        TaskKind::Technical => {
            "Assess trend, momentum, volatility, support and resistance from the recent price history. \
             Conclude with likely entry and exit zones and a technical rating."
        }
        TaskKind::DayTrader => {
            "Build an intraday plan from the technical analysis: entry triggers, targets, stop loss, \
             position size as a share of capital, and conditions that cancel the trade."
        }
        TaskKind::Final => {
            "Combine the reports below into one recommendation (BUY, HOLD or SELL) with a 12-month price target, \
             horizon, main risks and the confidence of the call. Explain where the analyses disagree."
        }
    }
}

fn section(prompt: &mut String, title: &str, body: &str) {
    let _ = write!(prompt, "\n\n## {title}\n\n{}", body.trim());
}

/// Full prompt for `input`, with optional market data and search context
pub fn build_prompt(input: &TaskInput, market: Option<&str>, search: Option<&str>) -> String {
    let mut prompt = format!(
        "Ticker: {}\nAnalysis mode: {}\nTask: {}\n\n{}",
        input.ticker,
        input.mode,
        input.task,
        instructions(input.task)
    );
    if let Some(market) = market {
        section(&mut prompt, "Market data", market);
    }
    if let Some(search) = search {
        section(&mut prompt, "Web search results", search);
    }
    for (kind, output) in &input.predecessor_outputs {
        section(&mut prompt, &format!("{} report", kind.role()), output);
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AgentRole, AnalysisMode, SharedMarketData};
    use uuid::Uuid;

    #[test]
    fn test_prompt_sections_in_order() {
        let input = TaskInput {
            run_id: Uuid::nil(),
            ticker: "WEGE3.SA".to_string(),
            mode: AnalysisMode::Quick,
            task: TaskKind::Final,
            role: AgentRole::InvestmentConsultant,
            predecessor_outputs: vec![
                (TaskKind::Research, "news".to_string()),
                (TaskKind::Technical, "uptrend".to_string()),
            ],
            market: SharedMarketData::default(),
        };
        let prompt = build_prompt(&input, Some("Source: mcp"), None);

        assert!(prompt.starts_with("Ticker: WEGE3.SA\nAnalysis mode: quick\nTask: final"));
        let market = prompt.find("## Market data").unwrap();
        let research = prompt.find("## Research Analyst report").unwrap();
        let technical = prompt.find("## Technical Analyst report").unwrap();
        assert!(market < research && research < technical);
        assert!(!prompt.contains("Web search"));
    }
}
