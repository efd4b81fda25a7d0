//! End-to-end runs with fake language model and market data

use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use stockcrew_core::{ProviderConfig, ProviderRegistry};
use stockcrew_llm::{
    ClientHandle, ClientSettings, ClientStrategy, CompletionRequest, CompletionResponse, LLMError,
    LLMProvider, LlmProviderId, LlmResolver, Message, StopReason, TokenUsage,
};
use stockcrew_market::{DataSource, MarketDataAggregator, MarketDataSource, MarketError, PriceBar, SourceData};
use stockcrew_runtime::AgentRuntime;
use stockcrew_search::{SearchProviderId, SearchRegistry, SearchResolver};
use stockcrew_workflow::{
    AgentTaskRunner, AnalysisMode, AnalysisTaskGraph, ArtifactWriter, Orchestrator, RunExecutor, TaskError,
    TaskKind, TaskStatus, WorkflowError,
};

/// Answers with the prompt's task line; refuses technical analysis of `BROKEN`
struct ScriptedAnalyst;

#[async_trait]
impl LLMProvider for ScriptedAnalyst {
    async fn complete(&self, request: CompletionRequest) -> stockcrew_llm::Result<CompletionResponse> {
        let prompt = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
        if prompt.starts_with("Ticker: BROKEN") && prompt.contains("Task: technical") {
            return Err(LLMError::UnexpectedResponse("model refused".to_string()));
        }
        let task_line = prompt.lines().find(|l| l.starts_with("Task:")).unwrap_or("Task: ?");
        Ok(CompletionResponse {
            message: Message::assistant(format!("# Report\n\n{task_line}")),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn build_scripted(_: &ClientSettings<'_>) -> stockcrew_llm::Result<Arc<dyn LLMProvider>> {
    Ok(Arc::new(ScriptedAnalyst))
}

/// Knows every symbol except `AAA`; counts every fetch
#[derive(Default)]
struct FakeExchange {
    calls: AtomicUsize,
}

#[async_trait]
impl MarketDataSource for FakeExchange {
    fn source(&self) -> DataSource {
        DataSource::Mcp
    }

    async fn fetch(&self, symbol: &str) -> stockcrew_market::Result<SourceData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if symbol == "AAA" {
            return Err(MarketError::NoDataForSymbol {
                source_name: "mcp".to_string(),
                symbol: symbol.to_string(),
            });
        }
        Ok(SourceData {
            quotes: Some(vec![PriceBar {
                timestamp: Utc::now(),
                open: 10.0,
                high: 11.0,
                low: 9.5,
                close: 10.5,
                volume: 1_000,
            }]),
            ..SourceData::default()
        })
    }
}

fn llm() -> ClientHandle {
    let config = ProviderConfig::new(LlmProviderId::OpenAI).with_credential("sk-test");
    let registry = Arc::new(ProviderRegistry::from_configs([config], LlmProviderId::OpenAI));
    LlmResolver::with_strategies(
        registry,
        [ClientStrategy {
            provider: LlmProviderId::OpenAI,
            build: build_scripted,
        }],
    )
    .resolve(None)
    .unwrap()
}

fn orchestrator(dir: &Path, parallel: bool) -> Orchestrator {
    orchestrator_with(dir, parallel, Arc::new(FakeExchange::default()))
}

fn orchestrator_with(dir: &Path, parallel: bool, exchange: Arc<FakeExchange>) -> Orchestrator {
    let runtime = AgentRuntime::builder().llm(llm()).build().unwrap();
    // No search provider configured: research gets simulated results
    let search = SearchResolver::new(Arc::new(SearchRegistry::from_configs(
        Vec::<ProviderConfig<SearchProviderId>>::new(),
        SearchProviderId::Searxng,
    )));
    let exchange: Arc<dyn MarketDataSource> = exchange;
    let market = MarketDataAggregator::with_sources([exchange]);

    let runner = AgentTaskRunner::new(Arc::new(runtime), Arc::new(search), Arc::new(market));
    let executor = RunExecutor::new(Arc::new(runner), ArtifactWriter::new(dir)).parallel(parallel);
    Orchestrator::new(AnalysisTaskGraph::new(dir), executor)
}

#[tokio::test]
async fn test_batch_isolates_failing_ticker() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = orchestrator(dir.path(), false);

    let tickers = vec!["AAA".to_string(), "BBB".to_string()];
    let summary = orchestrator.run_batch(&tickers, AnalysisMode::Quick).await;

    assert_eq!(summary.succeeded(), 1);
    assert_eq!(summary.failed(), 1);

    let aaa = summary.outcome("AAA").unwrap();
    assert!(!aaa.success);
    assert!(aaa.reports.is_empty());
    assert!(aaa.error.as_deref().unwrap().contains("No market data for AAA"));

    let bbb = summary.outcome("BBB").unwrap();
    assert!(bbb.success);
    assert_eq!(bbb.reports.len(), 4);
    for report in &bbb.reports {
        let text = std::fs::read_to_string(report).unwrap();
        assert!(text.starts_with("# Report"));
    }
    assert!(bbb.reports.iter().any(|p| {
        p.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("final_recommendation_BBB_"))
    }));
}

#[tokio::test]
async fn test_technical_failure_skips_daytrader() {
    let dir = tempfile::tempdir().unwrap();
    for parallel in [false, true] {
        let run = orchestrator(dir.path(), parallel)
            .run("BROKEN", AnalysisMode::Complete)
            .await
            .unwrap();

        assert_eq!(run.status(TaskKind::Research), Some(TaskStatus::Done));
        assert_eq!(run.status(TaskKind::Fundamental), Some(TaskStatus::Done));
        assert_eq!(run.status(TaskKind::Technical), Some(TaskStatus::Failed));
        assert_eq!(run.status(TaskKind::DayTrader), Some(TaskStatus::Skipped));
        assert_eq!(run.status(TaskKind::Final), Some(TaskStatus::Skipped));
        assert!(matches!(run.error(TaskKind::Technical), Some(TaskError::Agent(_))));

        let fundamental = &run.task(TaskKind::Fundamental).unwrap().output_path;
        assert!(fundamental.exists());
        let daytrader = &run.task(TaskKind::DayTrader).unwrap().output_path;
        assert!(!daytrader.exists());
    }
}

#[tokio::test]
async fn test_single_run_rejects_bad_ticker() {
    let dir = tempfile::tempdir().unwrap();
    let err = orchestrator(dir.path(), false)
        .run("../PETR4", AnalysisMode::Quick)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidSymbol(_)));
}

#[tokio::test]
async fn test_fundamental_mode_writes_two_reports_and_log() {
    let dir = tempfile::tempdir().unwrap();
    let run = orchestrator(dir.path(), false)
        .run("petr4.sa", AnalysisMode::Fundamental)
        .await
        .unwrap();

    assert!(run.is_success());
    assert_eq!(run.ticker, "PETR4.SA");
    assert_eq!(run.output(TaskKind::Fundamental), Some("# Report\n\nTask: fundamental"));

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names.len(), 3);
    assert!(names[0].starts_with("execution_log_PETR4.SA_"));
    assert!(names[1].starts_with("fundamental_PETR4.SA_"));
    assert!(names[2].starts_with("research_PETR4.SA_"));
}

#[tokio::test]
async fn test_market_data_fetched_once_per_run() {
    let dir = tempfile::tempdir().unwrap();
    for parallel in [false, true] {
        let exchange = Arc::new(FakeExchange::default());
        let run = orchestrator_with(dir.path(), parallel, Arc::clone(&exchange))
            .run("PETR4.SA", AnalysisMode::Complete)
            .await
            .unwrap();

        assert!(run.is_success());
        // research, fundamental, technical and daytrader all read market data
        assert_eq!(exchange.calls.load(Ordering::SeqCst), 1);
    }

    let exchange = Arc::new(FakeExchange::default());
    let orchestrator = orchestrator_with(dir.path(), true, Arc::clone(&exchange));
    let tickers = vec!["PETR4.SA".to_string(), "VALE3.SA".to_string()];
    orchestrator.run_batch(&tickers, AnalysisMode::Complete).await;
    assert_eq!(exchange.calls.load(Ordering::SeqCst), 2);
}
