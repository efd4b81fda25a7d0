//! SearXNG metasearch backend

use super::{build_client, endpoint, send_json};
use crate::{Result, SearchBackend, SearchHit, SearchProviderId};
use async_trait::async_trait;
use serde::Deserialize;
use stockcrew_core::ProviderConfig;
use tracing::debug;

/// Self-hosted SearXNG instance, queried through its JSON API
#[derive(Debug, Default, Clone)]
pub struct SearxngBackend;

#[derive(Debug, Deserialize)]
struct SearxngResponse {
    #[serde(default)]
    results: Vec<SearxngResult>,
}

#[derive(Debug, Deserialize)]
struct SearxngResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    score: Option<f64>,
}

impl SearxngResponse {
    fn into_hits(self, count: usize) -> Vec<SearchHit> {
        self.results
            .into_iter()
            .take(count)
            .map(|r| {
                let hit = SearchHit::new(r.title, r.url, r.content, "searxng");
                match r.score {
                    Some(score) => hit.with_score(score),
                    None => hit,
                }
            })
            .collect()
    }
}

#[async_trait]
impl SearchBackend for SearxngBackend {
    async fn search(
        &self,
        config: &ProviderConfig<SearchProviderId>,
        query: &str,
        count: usize,
    ) -> Result<Vec<SearchHit>> {
        let base = endpoint(config)?.trim_end_matches('/');
        let url = format!("{base}/search");
        debug!(url = %url, query = %query, "SearXNG search");

        let mut request = build_client(config)?.get(&url).query(&[
            ("q", query),
            ("format", "json"),
            ("categories", config.extra("CATEGORIES").unwrap_or("general")),
            ("language", config.extra("LANGUAGE").unwrap_or("pt-BR")),
            ("safesearch", config.extra("SAFE_SEARCH").unwrap_or("0")),
        ]);
        if let Some(key) = config.credential() {
            request = request.bearer_auth(key.expose());
        }

        let response: SearxngResponse = send_json(config.identity, request).await?;
        Ok(response.into_hits(count))
    }
}
