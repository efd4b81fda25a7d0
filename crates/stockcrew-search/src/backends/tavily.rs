//! Tavily search backend

use super::{build_client, endpoint, send_json};
use crate::{Result, SearchBackend, SearchError, SearchHit, SearchProviderId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stockcrew_core::ProviderConfig;
use tracing::debug;

/// Source tag for the synthesized answer hit
pub const ANSWER_SOURCE: &str = "tavily_answer";

/// Tavily search API, optimized for LLM consumption
#[derive(Debug, Default, Clone)]
pub struct TavilyBackend;

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    include_answer: bool,
    include_raw_content: bool,
    max_results: usize,
    include_domains: Vec<String>,
    exclude_domains: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    score: Option<f64>,
}

impl TavilyResponse {
    fn into_hits(self, count: usize) -> Vec<SearchHit> {
        let answer = self
            .answer
            .filter(|a| !a.trim().is_empty())
            .map(|a| SearchHit::new("Tavily AI Answer", "", a, ANSWER_SOURCE).with_score(1.0));

        let results = self.results.into_iter().take(count).map(|r| {
            let hit = SearchHit::new(r.title, r.url, r.content, "tavily");
            match r.score {
                Some(score) => hit.with_score(score),
                None => hit,
            }
        });

        answer.into_iter().chain(results).collect()
    }
}

#[async_trait]
impl SearchBackend for TavilyBackend {
    async fn search(
        &self,
        config: &ProviderConfig<SearchProviderId>,
        query: &str,
        count: usize,
    ) -> Result<Vec<SearchHit>> {
        let key = config
            .credential()
            .ok_or_else(|| SearchError::ProviderUnavailable(config.identity.to_string()))?;
        let url = endpoint(config)?;
        debug!(query = %query, "Tavily search");

        let body = TavilyRequest {
            query,
            search_depth: "basic",
            include_answer: true,
            include_raw_content: false,
            max_results: count,
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
        };
        let request = build_client(config)?
            .post(url)
            .bearer_auth(key.expose())
            .json(&body);

        let response: TavilyResponse = send_json(config.identity, request).await?;
        Ok(response.into_hits(count))
    }
}
