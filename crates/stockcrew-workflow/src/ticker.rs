//! Ticker symbols

use crate::{Result, WorkflowError};
use regex::Regex;
use std::sync::LazyLock;

/// B3 symbols offered by `--list-symbols`
pub const POPULAR_SYMBOLS: [&str; 15] = [
    "PETR4.SA", "VALE3.SA", "ITUB4.SA", "BBDC4.SA", "ABEV3.SA", "WEGE3.SA", "MGLU3.SA", "RENT3.SA",
    "LREN3.SA", "JBSS3.SA", "SUZB3.SA", "VIVT3.SA", "GGBR4.SA", "USIM5.SA", "CSNA3.SA",
];

const B3_SUFFIX: &str = ".SA";

static TICKER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9^][A-Z0-9.\-=^]{0,19}$").expect("Invalid regex pattern"));

/// Trim and upper-case a symbol, rejecting anything that is not one
///
/// Accepts letters, digits and the `.`, `-`, `^`, `=` found in exchange
/// suffixes and index or currency symbols.
pub fn validate_ticker(raw: &str) -> Result<String> {
    let ticker = raw.trim().to_ascii_uppercase();
    if TICKER_PATTERN.is_match(&ticker) {
        Ok(ticker)
    } else {
        Err(WorkflowError::InvalidSymbol(raw.to_string()))
    }
}

/// Interactive input: validate and append `.SA` when no suffix was given
pub fn normalize_interactive(raw: &str) -> Result<String> {
    let ticker = validate_ticker(raw)?;
    if ticker.contains('.') {
        Ok(ticker)
    } else {
        Ok(format!("{ticker}{B3_SUFFIX}"))
    }
}
