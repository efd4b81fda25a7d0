//! Concrete market data sources

mod alpha_vantage;
mod mcp;
mod yahoo;

pub use alpha_vantage::AlphaVantageSource;
pub use mcp::McpSource;
pub use yahoo::YahooSource;

use crate::{MarketError, Result};
use serde_json::Value;

/// Reject Alpha Vantage payloads that carry an error or throttling notice
pub(crate) fn check_alpha_vantage_payload(source_name: &str, payload: &Value) -> Result<()> {
    if let Some(message) = payload.get("Error Message").and_then(Value::as_str) {
        return Err(MarketError::request_failed(source_name, message));
    }
    if payload.get("Note").is_some() || payload.get("Information").is_some() {
        return Err(MarketError::RateLimitExceeded(source_name.to_string()));
    }
    Ok(())
}

/// Drop empty objects and arrays so absence stays distinguishable from data
pub(crate) fn non_empty(payload: Value) -> Option<Value> {
    match &payload {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Array(items) if items.is_empty() => None,
        _ => Some(payload),
    }
}
