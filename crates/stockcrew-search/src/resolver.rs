//! Search resolution with provider fallback

use crate::backends::{GoogleBackend, SearxngBackend, SerpApiBackend, TavilyBackend};
use crate::stub::simulated_hits;
use crate::{Result, SearchBackend, SearchError, SearchHit, SearchOutcome, SearchProviderId, SearchRegistry};
use std::collections::HashMap;
use std::sync::Arc;
use stockcrew_core::{ChainSuccess, first_success};
use tracing::{info, warn};

/// Result count used when neither the caller nor the provider config sets one
const FALLBACK_MAX_RESULTS: usize = 10;

/// Runs queries against the configured search providers
///
/// Providers are tried in [`SearchRegistry::fallback_order`]: the requested
/// (or default) provider first, then every other available provider in
/// declaration order. A provider that errors, answers with a non-2xx status,
/// returns a malformed payload, or finds nothing is skipped.
pub struct SearchResolver {
    registry: Arc<SearchRegistry>,
    backends: HashMap<SearchProviderId, Arc<dyn SearchBackend>>,
}

impl SearchResolver {
    /// Resolver with the built-in HTTP backend for every provider
    pub fn new(registry: Arc<SearchRegistry>) -> Self {
        let backends: [(SearchProviderId, Arc<dyn SearchBackend>); 4] = [
            (SearchProviderId::Searxng, Arc::new(SearxngBackend)),
            (SearchProviderId::Tavily, Arc::new(TavilyBackend)),
            (SearchProviderId::Google, Arc::new(GoogleBackend)),
            (SearchProviderId::SerpApi, Arc::new(SerpApiBackend)),
        ];
        Self::with_backends(registry, backends)
    }

    pub fn with_backends(
        registry: Arc<SearchRegistry>,
        backends: impl IntoIterator<Item = (SearchProviderId, Arc<dyn SearchBackend>)>,
    ) -> Self {
        Self {
            registry,
            backends: backends.into_iter().collect(),
        }
    }

    /// Replace the backend for one provider
    pub fn register(&mut self, provider: SearchProviderId, backend: Arc<dyn SearchBackend>) {
        self.backends.insert(provider, backend);
    }

    pub fn registry(&self) -> &SearchRegistry {
        &self.registry
    }

    /// Search using the fallback chain, failing if every provider fails
    pub async fn try_search(
        &self,
        query: &str,
        count: Option<usize>,
        preferred: Option<&str>,
    ) -> Result<ChainSuccess<SearchProviderId, Vec<SearchHit>>> {
        let order = self.registry.fallback_order(preferred);
        first_success(order, |provider| self.search_with(provider, query, count))
            .await
            .map_err(|exhausted| SearchError::AllSourcesExhausted(exhausted.to_string()))
    }

    /// Search using the fallback chain, answering with simulated hits when
    /// every provider fails
    pub async fn search(&self, query: &str, count: Option<usize>) -> SearchOutcome {
        self.search_preferring(query, count, None).await
    }

    pub async fn search_preferring(
        &self,
        query: &str,
        count: Option<usize>,
        preferred: Option<&str>,
    ) -> SearchOutcome {
        let order = self.registry.fallback_order(preferred);
        match first_success(order, |provider| self.search_with(provider, query, count)).await {
            Ok(success) => {
                info!(
                    provider = %success.provider,
                    hits = success.value.len(),
                    "Search completed"
                );
                SearchOutcome {
                    query: query.to_string(),
                    provider: Some(success.provider),
                    simulated: false,
                    hits: success.value,
                    failures: success.failures,
                }
            }
            Err(exhausted) => {
                warn!(query = %query, reason = %exhausted, "No search provider answered; using simulated results");
                SearchOutcome {
                    query: query.to_string(),
                    provider: None,
                    simulated: true,
                    hits: simulated_hits(query, count.unwrap_or(FALLBACK_MAX_RESULTS)),
                    failures: exhausted.failures,
                }
            }
        }
    }

    async fn search_with(
        &self,
        provider: SearchProviderId,
        query: &str,
        count: Option<usize>,
    ) -> Result<Vec<SearchHit>> {
        let unavailable = || SearchError::ProviderUnavailable(provider.to_string());
        let config = self.registry.config(provider).ok_or_else(unavailable)?;
        let backend = self.backends.get(&provider).ok_or_else(unavailable)?;
        let count = count
            .or(config.max_results)
            .unwrap_or(FALLBACK_MAX_RESULTS);

        let hits = backend.search(config, query, count).await?;
        if hits.is_empty() {
            return Err(SearchError::NoResults {
                provider: provider.to_string(),
            });
        }
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockSearchBackend;
    use crate::stub::SIMULATED_SOURCE;
    use stockcrew_utils::MapSource;

    fn registry() -> Arc<SearchRegistry> {
        let source: MapSource = [
            ("TAVILY_API_KEY", "tvly-test"),
            ("SERPAPI_API_KEY", "serp-test"),
            ("DEFAULT_SEARCH_PROVIDER", "tavily"),
        ]
        .into_iter()
        .collect();
        Arc::new(SearchRegistry::load(&source, Some("DEFAULT_SEARCH_PROVIDER")).unwrap())
    }

    fn failing(provider: &'static str) -> MockSearchBackend {
        let mut backend = MockSearchBackend::new();
        backend.expect_search().times(1).returning(move |_, _, _| {
            Err(SearchError::RequestFailed {
                provider: provider.to_string(),
                reason: "HTTP 503".to_string(),
            })
        });
        backend
    }

    fn answering(source: &'static str) -> MockSearchBackend {
        let mut backend = MockSearchBackend::new();
        backend
            .expect_search()
            .times(1)
            .returning(move |_, query, _| Ok(vec![SearchHit::new(query, "https://x.example", "s", source)]));
        backend
    }

    #[tokio::test]
    async fn test_falls_back_to_next_provider() {
        let resolver = SearchResolver::with_backends(
            registry(),
            [
                (SearchProviderId::Tavily, Arc::new(failing("tavily")) as Arc<dyn SearchBackend>),
                (SearchProviderId::SerpApi, Arc::new(answering("serpapi"))),
            ],
        );

        let outcome = resolver.search("PETR4 news", None).await;

        assert!(!outcome.simulated);
        assert_eq!(outcome.provider, Some(SearchProviderId::SerpApi));
        assert_eq!(outcome.hits[0].source, "serpapi");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].provider, SearchProviderId::Tavily);
    }

    #[tokio::test]
    async fn test_all_failures_yield_simulated_results() {
        let resolver = SearchResolver::with_backends(
            registry(),
            [
                (SearchProviderId::Tavily, Arc::new(failing("tavily")) as Arc<dyn SearchBackend>),
                (SearchProviderId::SerpApi, Arc::new(failing("serpapi"))),
            ],
        );

        let outcome = resolver.search("VALE3", Some(5)).await;

        assert!(outcome.simulated);
        assert_eq!(outcome.provider, None);
        assert_eq!(outcome.hits.len(), 3);
        assert!(outcome.hits.iter().all(|h| h.source == SIMULATED_SOURCE));
        assert_eq!(outcome.failures.len(), 2);
        assert!(outcome.to_context_text().contains("simulated"));
    }

    #[tokio::test]
    async fn test_try_search_reports_exhaustion() {
        let resolver = SearchResolver::with_backends(
            registry(),
            [
                (SearchProviderId::Tavily, Arc::new(failing("tavily")) as Arc<dyn SearchBackend>),
                (SearchProviderId::SerpApi, Arc::new(failing("serpapi"))),
            ],
        );

        let err = resolver.try_search("VALE3", None, None).await.unwrap_err();
        assert!(matches!(err, SearchError::AllSourcesExhausted(_)));
    }

    #[tokio::test]
    async fn test_empty_results_trigger_fallback() {
        let mut empty = MockSearchBackend::new();
        empty.expect_search().times(1).returning(|_, _, _| Ok(Vec::new()));

        let resolver = SearchResolver::with_backends(
            registry(),
            [
                (SearchProviderId::Tavily, Arc::new(empty) as Arc<dyn SearchBackend>),
                (SearchProviderId::SerpApi, Arc::new(answering("serpapi"))),
            ],
        );

        let success = resolver.try_search("ITUB4", None, None).await.unwrap();
        assert_eq!(success.provider, SearchProviderId::SerpApi);
        assert!(success.failures[0].error.contains("no results"));
    }

    #[tokio::test]
    async fn test_preferred_provider_goes_first() {
        let mut tavily = MockSearchBackend::new();
        tavily.expect_search().never();

        let resolver = SearchResolver::with_backends(
            registry(),
            [
                (SearchProviderId::Tavily, Arc::new(tavily) as Arc<dyn SearchBackend>),
                (SearchProviderId::SerpApi, Arc::new(answering("serpapi"))),
            ],
        );

        let outcome = resolver.search_preferring("BBDC4", None, Some("serpapi")).await;
        assert_eq!(outcome.provider, Some(SearchProviderId::SerpApi));
        assert!(outcome.failures.is_empty());
    }

    #[tokio::test]
    async fn test_configured_count_is_passed_to_backend() {
        let mut backend = MockSearchBackend::new();
        backend
            .expect_search()
            .withf(|config, _, count| config.identity == SearchProviderId::Tavily && *count == 10)
            .times(1)
            .returning(|_, _, _| Ok(vec![SearchHit::new("t", "u", "s", "tavily")]));

        let resolver = SearchResolver::with_backends(
            registry(),
            [(SearchProviderId::Tavily, Arc::new(backend) as Arc<dyn SearchBackend>)],
        );

        let outcome = resolver.search("ABEV3", None).await;
        assert_eq!(outcome.provider, Some(SearchProviderId::Tavily));
    }

    #[tokio::test]
    async fn test_no_providers_configured() {
        let registry = Arc::new(SearchRegistry::load(&MapSource::new(), None).unwrap());
        let resolver = SearchResolver::new(registry);

        let outcome = resolver.search("WEGE3", None).await;
        assert!(outcome.simulated);
        assert!(outcome.failures.is_empty());
    }
}
