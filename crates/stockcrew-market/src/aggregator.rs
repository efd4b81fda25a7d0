//! Source precedence and the merged per-ticker record

use crate::sources::{AlphaVantageSource, McpSource, YahooSource};
use crate::validation::cross_validate;
use crate::{
    DataSource, FinancialRecord, MarketDataSource, MarketError, MarketRegistry, RecordCache, Result,
    SourceComparison, SourceData,
};
use std::sync::Arc;
use stockcrew_core::first_success;
use tracing::{debug, info, warn};

/// Merges market data sources into one [`FinancialRecord`] per ticker
///
/// Sources are consulted in [`DataSource`] precedence order. The first one
/// that returns data becomes the record's `primary_source` and supplies every
/// block of the record. When all of them fail the record is sparse, tagged
/// with the base source, and lists why each source was passed over.
pub struct MarketDataAggregator {
    sources: Vec<Arc<dyn MarketDataSource>>,
    cache: Option<RecordCache>,
}

impl MarketDataAggregator {
    /// Aggregator over explicit sources; duplicates keep the first occurrence
    pub fn with_sources(sources: impl IntoIterator<Item = Arc<dyn MarketDataSource>>) -> Self {
        let mut ordered: Vec<Arc<dyn MarketDataSource>> = Vec::new();
        for source in sources {
            if ordered.iter().all(|s| s.source() != source.source()) {
                ordered.push(source);
            }
        }
        ordered.sort_by_key(|s| s.source());
        Self {
            sources: ordered,
            cache: None,
        }
    }

    /// Build the configured sources
    ///
    /// The Yahoo base source is always present, even when `YAHOO_ENABLED`
    /// switches it off in the registry.
    pub fn from_registry(registry: &MarketRegistry) -> Result<Self> {
        let mut sources: Vec<Arc<dyn MarketDataSource>> = Vec::new();
        if let Some(config) = registry.config(DataSource::Mcp) {
            sources.push(Arc::new(McpSource::from_config(config)?));
        }
        if let Some(config) = registry.config(DataSource::AlphaVantage) {
            sources.push(Arc::new(AlphaVantageSource::from_config(config)?));
        }
        sources.push(Arc::new(YahooSource::new()));
        Ok(Self::with_sources(sources))
    }

    pub fn with_cache(mut self, cache: RecordCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sources in precedence order
    pub fn available(&self) -> Vec<DataSource> {
        self.sources.iter().map(|s| s.source()).collect()
    }

    fn source(&self, source: DataSource) -> Option<&Arc<dyn MarketDataSource>> {
        self.sources.iter().find(|s| s.source() == source)
    }

    async fn fetch_from(&self, source: DataSource, symbol: &str) -> Result<SourceData> {
        let backend = self
            .source(source)
            .ok_or_else(|| MarketError::ProviderUnavailable(source.to_string()))?;
        let data = backend.fetch(symbol).await?;
        if data.is_empty() {
            return Err(MarketError::no_data(source, symbol));
        }
        Ok(data)
    }

    /// Merged record for `symbol`, failing only if every source fails
    pub async fn try_fetch(&self, symbol: &str) -> Result<FinancialRecord> {
        let order = self.available();
        let success = first_success(order, |source| self.fetch_from(source, symbol))
            .await
            .map_err(|exhausted| MarketError::AllSourcesExhausted(exhausted.to_string()))?;

        let mut record = FinancialRecord::from_source(symbol, success.provider, success.value);
        record.diagnostics = success
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.provider, f.error))
            .collect();
        Ok(record)
    }

    /// Merged record for `symbol`; never fails, but may be sparse
    pub async fn fetch(&self, symbol: &str) -> FinancialRecord {
        if let Some(cache) = &self.cache {
            if let Some(record) = cache.get(symbol).await {
                debug!(symbol, source = %record.primary_source, "Market data cache hit");
                return record;
            }
        }

        match self.try_fetch(symbol).await {
            Ok(record) => {
                info!(symbol, source = %record.primary_source, "Market data collected");
                if let Some(cache) = &self.cache {
                    cache.insert(record.clone()).await;
                }
                record
            }
            Err(e) => {
                warn!(symbol, error = %e, "No market data source answered; returning sparse record");
                FinancialRecord::sparse(symbol, vec![e.to_string()])
            }
        }
    }

    /// Compare the overviews two sources report for `symbol`
    pub async fn compare_sources(
        &self,
        symbol: &str,
        left: DataSource,
        right: DataSource,
        tolerance_pct: f64,
    ) -> Result<SourceComparison> {
        let (left_data, right_data) =
            futures::future::join(self.fetch_from(left, symbol), self.fetch_from(right, symbol)).await;

        let overview = |source: DataSource, data: Result<SourceData>| {
            data?.overview.ok_or_else(|| MarketError::no_data(source, symbol))
        };
        let left_overview = overview(left, left_data)?;
        let right_overview = overview(right, right_data)?;

        Ok(SourceComparison {
            symbol: symbol.to_string(),
            left,
            right,
            tolerance_pct,
            metrics: cross_validate(&left_overview, &right_overview, tolerance_pct),
        })
    }
}
