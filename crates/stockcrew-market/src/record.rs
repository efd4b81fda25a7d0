//! Financial data model

use crate::DataSource;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write;

/// Company fundamentals as reported by Alpha Vantage `OVERVIEW`
///
/// Values stay in their reported string form; Alpha Vantage uses `"None"` or
/// `"-"` for missing numbers. Use [`CompanyOverview::number`] to read one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompanyOverview {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    pub market_cap: Option<String>,
    #[serde(rename = "PERatio")]
    pub pe_ratio: Option<String>,
    #[serde(rename = "PEGRatio")]
    pub peg_ratio: Option<String>,
    #[serde(rename = "PriceToBookRatio")]
    pub price_to_book: Option<String>,
    #[serde(rename = "EVToEBITDA")]
    pub ev_to_ebitda: Option<String>,
    #[serde(rename = "ReturnOnEquityTTM")]
    pub roe: Option<String>,
    #[serde(rename = "ReturnOnAssetsTTM")]
    pub roa: Option<String>,
    pub profit_margin: Option<String>,
    #[serde(rename = "OperatingMarginTTM")]
    pub operating_margin: Option<String>,
    #[serde(rename = "RevenueTTM")]
    pub revenue_ttm: Option<String>,
    #[serde(rename = "EBITDA")]
    pub ebitda: Option<String>,
    #[serde(rename = "EPS")]
    pub eps: Option<String>,
    pub book_value: Option<String>,
    pub dividend_yield: Option<String>,
    pub beta: Option<String>,
    #[serde(rename = "52WeekHigh")]
    pub week_52_high: Option<String>,
    #[serde(rename = "52WeekLow")]
    pub week_52_low: Option<String>,
    pub analyst_target_price: Option<String>,
}

impl CompanyOverview {
    /// Parse an `OVERVIEW` payload; `None` when it carries no symbol
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let overview: Self = serde_json::from_value(payload.clone()).ok()?;
        overview.symbol.as_ref()?;
        Some(overview)
    }

    /// Numeric value of a reported field, `None` for placeholders
    pub fn number(field: Option<&str>) -> Option<f64> {
        let raw = field?.trim();
        if raw.is_empty() || raw == "None" || raw == "-" {
            return None;
        }
        raw.parse().ok()
    }
}

/// Raw financial statements, one optional payload per report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub income_statement: Option<Value>,
    pub balance_sheet: Option<Value>,
    pub cash_flow: Option<Value>,
    pub earnings: Option<Value>,
}

impl FinancialStatements {
    pub fn is_empty(&self) -> bool {
        self.income_statement.is_none()
            && self.balance_sheet.is_none()
            && self.cash_flow.is_none()
            && self.earnings.is_none()
    }

    /// Names of the reports that are present
    pub fn available(&self) -> Vec<&'static str> {
        [
            ("income statement", &self.income_statement),
            ("balance sheet", &self.balance_sheet),
            ("cash flow", &self.cash_flow),
            ("earnings", &self.earnings),
        ]
        .into_iter()
        .filter_map(|(name, payload)| payload.as_ref().map(|_| name))
        .collect()
    }
}

/// Daily price bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Parse an Alpha Vantage `Time Series (Daily)` payload, oldest bar first
///
/// Accepts either the full response or the bare series object.
pub fn parse_daily_series(payload: &Value) -> Vec<PriceBar> {
    let series = payload
        .get("Time Series (Daily)")
        .unwrap_or(payload)
        .as_object();
    let Some(series) = series else {
        return Vec::new();
    };

    let field = |values: &Value, key: &str| -> f64 {
        values[key].as_str().and_then(|v| v.parse().ok()).unwrap_or(0.0)
    };

    let mut bars: Vec<PriceBar> = series
        .iter()
        .filter_map(|(date, values)| {
            let timestamp = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)?
                .and_utc();
            Some(PriceBar {
                timestamp,
                open: field(values, "1. open"),
                high: field(values, "2. high"),
                low: field(values, "3. low"),
                close: field(values, "4. close"),
                volume: values["5. volume"]
                    .as_str()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0),
            })
        })
        .collect();
    bars.sort_by_key(|bar| bar.timestamp);
    bars
}

/// One dividend payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendPayment {
    pub paid_at: DateTime<Utc>,
    pub amount: f64,
}

/// Dividends paid over a lookback window, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DividendHistory {
    pub lookback_days: i64,
    pub payments: Vec<DividendPayment>,
}

impl DividendHistory {
    pub fn new(lookback_days: i64, mut payments: Vec<DividendPayment>) -> Self {
        payments.sort_by_key(|p| p.paid_at);
        Self {
            lookback_days,
            payments,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    pub fn count(&self) -> usize {
        self.payments.len()
    }

    pub fn total(&self) -> f64 {
        self.payments.iter().map(|p| p.amount).sum()
    }

    pub fn average(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.total() / self.count() as f64)
    }

    /// Yearly payout over `price`, in percent
    pub fn annual_yield_pct(&self, price: f64) -> Option<f64> {
        if self.is_empty() || self.lookback_days <= 0 || price <= 0.0 {
            return None;
        }
        let years = self.lookback_days as f64 / 365.0;
        Some(self.total() / years / price * 100.0)
    }
}

/// What a single source returned for a symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceData {
    pub overview: Option<CompanyOverview>,
    pub statements: Option<FinancialStatements>,
    pub quotes: Option<Vec<PriceBar>>,
    pub dividends: Option<DividendHistory>,
}

impl SourceData {
    pub fn is_empty(&self) -> bool {
        self.overview.is_none()
            && self.statements.as_ref().is_none_or(FinancialStatements::is_empty)
            && self.quotes.as_ref().is_none_or(Vec::is_empty)
            && self.dividends.as_ref().is_none_or(DividendHistory::is_empty)
    }
}

/// Market data for one ticker, taken entirely from `primary_source`
///
/// A missing block means the source did not provide it, not that the value
/// is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub symbol: String,
    pub primary_source: DataSource,
    pub overview: Option<CompanyOverview>,
    pub statements: Option<FinancialStatements>,
    pub quotes: Option<Vec<PriceBar>>,
    #[serde(default)]
    pub dividends: Option<DividendHistory>,
    /// Why higher-precedence sources were passed over
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
    pub retrieved_at: DateTime<Utc>,
}

impl FinancialRecord {
    pub fn from_source(symbol: impl Into<String>, source: DataSource, data: SourceData) -> Self {
        Self {
            symbol: symbol.into(),
            primary_source: source,
            overview: data.overview,
            statements: data.statements.filter(|s| !s.is_empty()),
            quotes: data.quotes.filter(|q| !q.is_empty()),
            dividends: data.dividends.filter(|d| !d.is_empty()),
            diagnostics: Vec::new(),
            retrieved_at: Utc::now(),
        }
    }

    /// Record with no data blocks, attributed to the base source
    pub fn sparse(symbol: impl Into<String>, diagnostics: Vec<String>) -> Self {
        Self {
            diagnostics,
            ..Self::from_source(symbol, DataSource::MarketDataBase, SourceData::default())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.overview.is_none() && self.statements.is_none() && self.quotes.is_none() && self.dividends.is_none()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.quotes.as_ref()?.last().map(|bar| bar.close)
    }

    /// Plain-text digest handed to analyst prompts
    pub fn context_summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "MARKET DATA FOR {}", self.symbol);
        let _ = writeln!(out, "Primary source: {}", self.primary_source);
        let _ = writeln!(out, "Retrieved at: {}", self.retrieved_at.format("%Y-%m-%d %H:%M UTC"));

        if self.is_empty() {
            out.push_str("\nNo market data could be retrieved for this symbol.\n");
        }

        if let Some(overview) = &self.overview {
            let na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
            out.push_str("\nCompany fundamentals:\n");
            for (label, value) in [
                ("Company", &overview.name),
                ("Sector", &overview.sector),
                ("Industry", &overview.industry),
                ("Market cap", &overview.market_cap),
                ("P/E ratio", &overview.pe_ratio),
                ("PEG ratio", &overview.peg_ratio),
                ("Price/book", &overview.price_to_book),
                ("ROE", &overview.roe),
                ("Profit margin", &overview.profit_margin),
                ("EPS", &overview.eps),
                ("Dividend yield", &overview.dividend_yield),
                ("Beta", &overview.beta),
                ("52-week high", &overview.week_52_high),
                ("52-week low", &overview.week_52_low),
                ("Analyst target", &overview.analyst_target_price),
            ] {
                let _ = writeln!(out, "- {label}: {}", na(value));
            }
        }

        if let Some(statements) = &self.statements {
            let _ = writeln!(
                out,
                "\nFinancial statements available: {}",
                statements.available().join(", ")
            );
        }

        if let Some(quotes) = &self.quotes {
            let _ = writeln!(out, "\nRecent prices ({} daily bars):", quotes.len());
            for bar in quotes.iter().rev().take(5) {
                let _ = writeln!(
                    out,
                    "- {}: open {:.2} high {:.2} low {:.2} close {:.2} volume {}",
                    bar.timestamp.format("%Y-%m-%d"),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume
                );
            }
        }

        if let Some(dividends) = &self.dividends {
            let _ = writeln!(
                out,
                "\nDividends over the last {} days: {} payments, total {:.4}, average {:.4}",
                dividends.lookback_days,
                dividends.count(),
                dividends.total(),
                dividends.average().unwrap_or_default()
            );
            for payment in dividends.payments.iter().rev().take(10) {
                let _ = writeln!(out, "- {}: {:.4}", payment.paid_at.format("%Y-%m-%d"), payment.amount);
            }
            if let Some(pct) = self.last_close().and_then(|close| dividends.annual_yield_pct(close)) {
                let _ = writeln!(out, "Approximate annual yield: {pct:.2}%");
            }
        }

        if !self.diagnostics.is_empty() {
            out.push_str("\nSource notes:\n");
            for note in &self.diagnostics {
                let _ = writeln!(out, "- {note}");
            }
        }
        out
    }
}
