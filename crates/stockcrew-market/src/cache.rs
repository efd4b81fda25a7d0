//! Per-ticker cache of merged records

use crate::FinancialRecord;
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Thread-safe, time-bounded cache of [`FinancialRecord`]s keyed by symbol
#[derive(Clone)]
pub struct RecordCache {
    cache: Arc<RwLock<TimedCache<String, FinancialRecord>>>,
}

impl RecordCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    pub async fn get(&self, symbol: &str) -> Option<FinancialRecord> {
        let mut cache = self.cache.write().await;
        cache.cache_get(symbol).cloned()
    }

    pub async fn insert(&self, record: FinancialRecord) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(record.symbol.clone(), record);
    }

    pub async fn invalidate(&self, symbol: &str) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(symbol);
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.cache_size()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl std::fmt::Debug for RecordCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordCache").finish_non_exhaustive()
    }
}
