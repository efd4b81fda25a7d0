//! Ordered fallback over interchangeable providers

use std::fmt;
use std::future::Future;
use tracing::{info, warn};

/// A provider that was tried and failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt<P> {
    pub provider: P,
    pub error: String,
}

/// Result of the first provider that succeeded
#[derive(Debug)]
pub struct ChainSuccess<P, T> {
    pub provider: P,
    pub value: T,
    /// Providers tried before `provider`, in order
    pub failures: Vec<FailedAttempt<P>>,
}

/// Every candidate failed
#[derive(Debug, Clone)]
pub struct ChainExhausted<P> {
    pub failures: Vec<FailedAttempt<P>>,
}

impl<P: fmt::Display> fmt::Display for ChainExhausted<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return f.write_str("no providers to try");
        }
        write!(f, "all {} providers failed", self.failures.len())?;
        for attempt in &self.failures {
            write!(f, "; {}: {}", attempt.provider, attempt.error)?;
        }
        Ok(())
    }
}

impl<P: fmt::Debug + fmt::Display> std::error::Error for ChainExhausted<P> {}

/// Try `attempt` with each candidate in order until one succeeds
///
/// Candidates already tried are skipped, so callers may pass a preferred
/// provider followed by the full list.
pub async fn first_success<P, T, E, F, Fut>(
    candidates: impl IntoIterator<Item = P>,
    mut attempt: F,
) -> Result<ChainSuccess<P, T>, ChainExhausted<P>>
where
    P: Copy + PartialEq + fmt::Display,
    E: fmt::Display,
    F: FnMut(P) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut tried: Vec<P> = Vec::new();
    let mut failures = Vec::new();

    for provider in candidates {
        if tried.contains(&provider) {
            continue;
        }
        tried.push(provider);

        match attempt(provider).await {
            Ok(value) => {
                if !failures.is_empty() {
                    info!(provider = %provider, failed = failures.len(), "Fallback provider succeeded");
                }
                return Ok(ChainSuccess {
                    provider,
                    value,
                    failures,
                });
            }
            Err(e) => {
                warn!(provider = %provider, error = %e, "Provider attempt failed");
                failures.push(FailedAttempt {
                    provider,
                    error: e.to_string(),
                });
            }
        }
    }

    Err(ChainExhausted { failures })
}
