//! Yahoo Finance base source

use crate::{
    DataSource, DividendHistory, DividendPayment, MarketDataSource, MarketError, PriceBar, Result, SourceData,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use time::OffsetDateTime;
use tracing::{debug, info};
use yahoo_finance_api as yahoo;

/// Base source: daily quotes and dividend history from Yahoo Finance
///
/// Works without credentials and for B3 symbols as given (`PETR4.SA`).
/// Quotes and dividends come from a single history request spanning the
/// longer of the two windows.
#[derive(Debug, Clone)]
pub struct YahooSource {
    history_days: i64,
    dividend_days: i64,
}

impl YahooSource {
    pub fn new() -> Self {
        Self {
            history_days: 30,
            dividend_days: 730,
        }
    }

    pub fn with_history_days(mut self, days: i64) -> Self {
        self.history_days = days.max(1);
        self
    }

    /// Dividend lookback; 0 skips dividends
    pub fn with_dividend_days(mut self, days: i64) -> Self {
        self.dividend_days = days.max(0);
        self
    }

    fn yahoo_error(e: impl std::fmt::Display) -> MarketError {
        MarketError::request_failed(DataSource::MarketDataBase, e)
    }

    /// Daily bars for the last `history_days` and dividends for the last
    /// `dividend_days`, both oldest first
    pub async fn history(&self, symbol: &str) -> Result<(Vec<PriceBar>, DividendHistory)> {
        let provider = yahoo::YahooConnector::new().map_err(Self::yahoo_error)?;

        let end = Utc::now();
        let start = end - Duration::days(self.history_days.max(self.dividend_days));
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp()).map_err(Self::yahoo_error)?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp()).map_err(Self::yahoo_error)?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(Self::yahoo_error)?;
        let quotes = response.quotes().map_err(Self::yahoo_error)?;
        // A symbol without payouts has no dividend events at all
        let dividends = response.dividends().unwrap_or_default();

        let quotes_since = end - Duration::days(self.history_days);
        let bars = quotes
            .iter()
            .map(|q| PriceBar {
                timestamp: DateTime::from_timestamp(q.timestamp as i64, 0).unwrap_or(end),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
            })
            .filter(|bar| bar.timestamp >= quotes_since)
            .collect();

        let payments = dividends.iter().map(|d| (d.date as i64, d.amount));
        let history = dividend_history(payments, self.dividend_days, end);
        Ok((bars, history))
    }
}

/// Payments made within `lookback_days` before `now`
fn dividend_history(
    payments: impl IntoIterator<Item = (i64, f64)>,
    lookback_days: i64,
    now: DateTime<Utc>,
) -> DividendHistory {
    let since = now - Duration::days(lookback_days);
    let payments = payments
        .into_iter()
        .filter_map(|(ts, amount)| {
            let paid_at = DateTime::from_timestamp(ts, 0)?;
            (paid_at >= since && amount > 0.0).then_some(DividendPayment { paid_at, amount })
        })
        .collect();
    DividendHistory::new(lookback_days, payments)
}

impl Default for YahooSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataSource for YahooSource {
    fn source(&self) -> DataSource {
        DataSource::MarketDataBase
    }

    async fn fetch(&self, symbol: &str) -> Result<SourceData> {
        info!(
            symbol,
            days = self.history_days,
            dividend_days = self.dividend_days,
            "Collecting quotes via Yahoo Finance"
        );
        let (bars, dividends) = self.history(symbol).await?;
        if bars.is_empty() {
            return Err(MarketError::no_data(DataSource::MarketDataBase, symbol));
        }
        debug!(symbol, payments = dividends.count(), "Dividend history collected");
        Ok(SourceData {
            quotes: Some(bars),
            dividends: (!dividends.is_empty()).then_some(dividends),
            ..SourceData::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_days_floor() {
        assert_eq!(YahooSource::new().with_history_days(0).history_days, 1);
    }

    #[test]
    fn test_dividend_window() {
        let now = DateTime::from_timestamp(1_725_000_000, 0).unwrap();
        let day = 86_400;
        let raw = [
            (now.timestamp() - 800 * day, 9.0),
            (now.timestamp() - 400 * day, 1.20),
            (now.timestamp() - 200 * day, 0.80),
            (now.timestamp() - 10 * day, 0.0),
            (now.timestamp() - 5 * day, 0.50),
        ];

        let history = dividend_history(raw, 730, now);
        assert_eq!(history.count(), 3);
        assert!((history.total() - 2.5).abs() < 1e-9);
        assert_eq!(history.payments.last().unwrap().amount, 0.50);

        assert!(dividend_history(raw, 0, now).is_empty());
    }

    #[test]
    fn test_dividend_days_floor() {
        assert_eq!(YahooSource::new().with_dividend_days(-5).dividend_days, 0);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_b3_symbol() {
        let data = YahooSource::new().fetch("PETR4.SA").await.unwrap();
        let quotes = data.quotes.unwrap();
        assert!(!quotes.is_empty());
        assert!(quotes.last().unwrap().close > 0.0);
    }
}
