//! Execution context for agents
//!
//! The `Context` struct is a key-value store passed to an agent for one task
//! execution. The orchestrator fills in the run identity (ticker, mode, task)
//! and agents may stash intermediate values for the duration of the call.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known context keys
pub mod keys {
    /// Ticker symbol under analysis (e.g. "PETR4.SA")
    pub const TICKER: &str = "ticker";
    /// Analysis depth mode (e.g. "quick")
    pub const MODE: &str = "mode";
    /// Task identity being executed (e.g. "technical")
    pub const TASK: &str = "task";
    /// Unique id of the analysis run
    pub const RUN_ID: &str = "run_id";
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use stockcrew_core::Context;
///
/// let ctx = Context::new()
///     .with_ticker("VALE3.SA")
///     .with_task("research");
///
/// assert_eq!(ctx.ticker(), Some("VALE3.SA"));
/// assert_eq!(ctx.task(), Some("research"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.insert(keys::TICKER, serde_json::json!(ticker.into()));
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.insert(keys::MODE, serde_json::json!(mode.into()));
        self
    }

    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.insert(keys::TASK, serde_json::json!(task.into()));
        self
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.insert(keys::RUN_ID, serde_json::json!(run_id.into()));
        self
    }

    pub fn ticker(&self) -> Option<&str> {
        self.get_str(keys::TICKER)
    }

    pub fn mode(&self) -> Option<&str> {
        self.get_str(keys::MODE)
    }

    pub fn task(&self) -> Option<&str> {
        self.get_str(keys::TASK)
    }

    pub fn run_id(&self) -> Option<&str> {
        self.get_str(keys::RUN_ID)
    }

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    /// Insert a typed value, serialized to JSON
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize context value: {e}"))
        })?;
        self.data.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a typed value, deserialized from JSON
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        self.data
            .get(key)
            .map(|value| {
                serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize context value: {e}"
                    ))
                })
            })
            .transpose()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Quote {
        price: f64,
        currency: String,
    }

    #[test]
    fn test_run_identity() {
        let ctx = Context::new()
            .with_ticker("ITUB4.SA")
            .with_mode("complete")
            .with_task("final")
            .with_run_id("run-1");

        assert_eq!(ctx.ticker(), Some("ITUB4.SA"));
        assert_eq!(ctx.mode(), Some("complete"));
        assert_eq!(ctx.task(), Some("final"));
        assert_eq!(ctx.run_id(), Some("run-1"));
        assert_eq!(ctx.len(), 4);
    }

    #[test]
    fn test_typed_insert_get() {
        let mut ctx = Context::new();
        let quote = Quote {
            price: 37.2,
            currency: "BRL".to_string(),
        };

        ctx.insert_typed("quote", &quote).unwrap();
        let back: Quote = ctx.get_typed("quote").unwrap().unwrap();
        assert_eq!(back, quote);
    }

    #[test]
    fn test_get_typed_missing_key() {
        let ctx = Context::new();
        let result: crate::Result<Option<Quote>> = ctx.get_typed("missing");
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_get_typed_wrong_shape() {
        let mut ctx = Context::new();
        ctx.insert("quote", serde_json::json!("not an object"));
        assert!(ctx.get_typed::<Quote>("quote").is_err());
    }
}
