//! Command-line interface for stockcrew
//!
//! # Usage
//!
//! ```bash
//! # One ticker, full analysis
//! stockcrew PETR4.SA --type complete
//!
//! # Several tickers; failures are reported in the summary
//! stockcrew --batch PETR4.SA VALE3.SA ITUB4.SA
//!
//! # No ticker: read tickers from stdin
//! stockcrew
//! ```

use clap::Parser;
use comfy_table::Table;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use stockcrew_market::{DataSource, MarketDataAggregator};
use stockcrew_utils::{AppConfig, EnvSource, init_tracing, init_tracing_with};
use stockcrew_workflow::{
    AnalysisMode, AnalysisRun, BatchSummary, Orchestrator, POPULAR_SYMBOLS, Settings, WorkflowError,
    normalize_interactive,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "stockcrew")]
#[command(version, about = "Multi-agent stock analysis", long_about = None)]
struct Args {
    /// Ticker to analyse (e.g. PETR4.SA)
    ticker: Option<String>,

    /// Analysis depth: complete, quick, technical or fundamental
    #[arg(short = 't', long = "type", default_value = "quick")]
    analysis_type: String,

    /// Analyse several tickers
    #[arg(short, long, num_args = 1.., value_name = "TICKER")]
    batch: Option<Vec<String>>,

    /// Language model provider (openai, anthropic, deepseek, grok, ollama)
    #[arg(short, long)]
    model: Option<String>,

    /// Print popular B3 symbols and exit
    #[arg(long)]
    list_symbols: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    check_config: bool,

    /// Compare the two Alpha Vantage sources for a ticker and exit
    #[arg(long, value_name = "TICKER")]
    compare_sources: Option<String>,
}

const EXIT_WORDS: [&str; 3] = ["quit", "q", "exit"];

/// Process status of a finished command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Failure,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure => ExitCode::FAILURE,
        }
    }
}

/// A single run succeeds only when every task is done
fn single_run_outcome(result: &Result<AnalysisRun, WorkflowError>) -> Outcome {
    match result {
        Ok(run) if run.is_success() => Outcome::Success,
        _ => Outcome::Failure,
    }
}

/// Per-ticker failures are reported in the summary, not the exit status
fn batch_outcome(_summary: &BatchSummary) -> Outcome {
    Outcome::Success
}

fn list_symbols() {
    println!("Popular B3 symbols:");
    for symbol in POPULAR_SYMBOLS {
        println!("  {symbol}");
    }
}

fn print_config(settings: &Settings) -> anyhow::Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(&settings.summary())?);

    let report = settings.validate();
    for problem in &report.errors {
        println!("error: {problem}");
    }
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    let recommendations = settings.recommendations();
    if !recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in recommendations {
            println!("  - {rec}");
        }
    }

    Ok(if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn compare_sources(settings: &Settings, ticker: &str) -> anyhow::Result<ExitCode> {
    let aggregator = MarketDataAggregator::from_registry(&settings.market)?;
    let tolerance = settings.app.cross_validation_tolerance_pct;
    let comparison = match aggregator
        .compare_sources(ticker, DataSource::Mcp, DataSource::AlphaVantage, tolerance)
        .await
    {
        Ok(comparison) => comparison,
        Err(e) => {
            eprintln!("Could not compare sources for {ticker}: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut table = Table::new();
    table.set_header(vec![
        "Metric".to_string(),
        comparison.left.to_string(),
        comparison.right.to_string(),
        "Difference".to_string(),
        "Status".to_string(),
    ]);
    for metric in &comparison.metrics {
        table.add_row(vec![
            metric.metric.to_string(),
            metric.left.clone(),
            metric.right.clone(),
            metric
                .difference_pct
                .map_or_else(|| "-".to_string(), |d| format!("{d:.2}%")),
            metric.status.to_string(),
        ]);
    }
    println!("{} (tolerance {tolerance}%)\n{table}", comparison.symbol);
    Ok(ExitCode::SUCCESS)
}

fn print_run(run: &AnalysisRun) {
    let mut table = Table::new();
    table.set_header(vec!["Task", "Status", "Report"]);
    for task in run.tasks() {
        let status = run.status(task.kind).map(|s| s.to_string()).unwrap_or_default();
        let detail = match run.error(task.kind) {
            Some(error) => error.to_string(),
            None if run.output(task.kind).is_some() => task.output_path.display().to_string(),
            None => String::new(),
        };
        table.add_row(vec![task.kind.to_string(), status, detail]);
    }
    println!("\n{} ({})\n{table}", run.ticker, run.mode);
}

fn print_batch(summary: &BatchSummary) {
    let mut table = Table::new();
    table.set_header(vec!["Ticker", "Result", "Tasks", "Details"]);
    for outcome in &summary.outcomes {
        table.add_row(vec![
            outcome.ticker.clone(),
            if outcome.success { "ok" } else { "failed" }.to_string(),
            format!("{}/{}", outcome.tasks_done, outcome.tasks_total),
            outcome.error.clone().unwrap_or_default(),
        ]);
    }
    println!("\n{table}");
    println!("Succeeded: {}  Failed: {}", summary.succeeded(), summary.failed());
}

async fn interactive(orchestrator: &Orchestrator) -> anyhow::Result<ExitCode> {
    println!("Enter a ticker (e.g. PETR4), or 'quit' to leave.");
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("ticker> ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&input.to_ascii_lowercase().as_str()) {
            break;
        }

        let ticker = match normalize_interactive(input) {
            Ok(ticker) => ticker,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        match orchestrator.run(&ticker, AnalysisMode::Quick).await {
            Ok(run) => print_run(&run),
            Err(e) => eprintln!("Error: {e}"),
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if args.list_symbols {
        list_symbols();
        return Ok(ExitCode::SUCCESS);
    }

    let source = EnvSource::new();
    match AppConfig::from_source(&source) {
        Ok(app) => init_tracing_with(&app.log_settings()),
        Err(_) => init_tracing(),
    }

    let settings = match Settings::load(&source) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Configuration error");
            eprintln!("Configuration error: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };
    settings.log_status();

    if args.check_config {
        return print_config(&settings);
    }
    if let Some(ticker) = args.compare_sources.as_deref() {
        return compare_sources(&settings, ticker).await;
    }

    let mode: AnalysisMode = match args.analysis_type.parse() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let orchestrator = match Orchestrator::from_settings(&settings, args.model.as_deref()) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            error!(error = %e, "Startup failed");
            eprintln!("Startup failed: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if let Some(tickers) = args.batch {
        info!(count = tickers.len(), mode = %mode, "Starting batch");
        let summary = orchestrator.run_batch(&tickers, mode).await;
        print_batch(&summary);
        return Ok(batch_outcome(&summary).into());
    }

    match args.ticker {
        Some(ticker) => {
            let result = orchestrator.run(&ticker, mode).await;
            match &result {
                Ok(run) => print_run(run),
                Err(e) => eprintln!("Analysis of {ticker} failed: {e}"),
            }
            Ok(single_run_outcome(&result).into())
        }
        None => interactive(&orchestrator).await,
    }
}
