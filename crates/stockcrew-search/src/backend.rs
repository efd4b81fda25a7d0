//! Search backend abstraction

use crate::{Result, SearchHit, SearchProviderId};
use async_trait::async_trait;
use stockcrew_core::ProviderConfig;

/// A single web search API
///
/// Implementations translate the provider's response into [`SearchHit`]s and
/// report any transport or payload problem as
/// [`SearchError::RequestFailed`](crate::SearchError::RequestFailed).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(
        &self,
        config: &ProviderConfig<SearchProviderId>,
        query: &str,
        count: usize,
    ) -> Result<Vec<SearchHit>>;
}
