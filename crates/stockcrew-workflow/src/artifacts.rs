//! Report and execution-log files

use crate::{AnalysisRun, Result, TaskKind};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::debug;

const STAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// Ticker as it appears in file names: `/` and whitespace become `_`
pub fn sanitize_ticker(ticker: &str) -> String {
    ticker
        .trim()
        .chars()
        .map(|c| if c == '/' || c.is_whitespace() { '_' } else { c })
        .collect()
}

/// `{dir}/{stem}_{TICKER}_{YYYYmmdd_HHMM}.md`
pub fn report_path(dir: &Path, kind: TaskKind, ticker: &str, started: NaiveDateTime) -> PathBuf {
    dir.join(format!(
        "{}_{}_{}.md",
        kind.file_stem(),
        sanitize_ticker(ticker),
        started.format(STAMP_FORMAT)
    ))
}

/// `{dir}/execution_log_{TICKER}_{YYYYmmdd_HHMM}.log`
pub fn execution_log_path(dir: &Path, ticker: &str, started: NaiveDateTime) -> PathBuf {
    dir.join(format!(
        "execution_log_{}_{}.log",
        sanitize_ticker(ticker),
        started.format(STAMP_FORMAT)
    ))
}

/// Writes a run's files under the reports directory
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one task report to `path`, creating its directory if needed
    pub async fn write_report(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
        debug!(path = %path.display(), bytes = contents.len(), "Report written");
        Ok(())
    }

    /// Write the run's status lines and return the log path
    pub async fn write_execution_log(&self, run: &AnalysisRun) -> Result<PathBuf> {
        let path = execution_log_path(&self.dir, &run.ticker, run.started_at.naive_local());
        let mut body = format!(
            "run_id: {}\nticker: {}\nmode: {}\nstarted_at: {}\n\n",
            run.run_id,
            run.ticker,
            run.mode,
            run.started_at.to_rfc3339()
        );
        for line in run.status_lines() {
            body.push_str(&line);
            body.push('\n');
        }
        self.write_report(&path, &body).await?;
        Ok(path)
    }
}
