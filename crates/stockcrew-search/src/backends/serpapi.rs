//! SerpAPI backend

use super::{build_client, endpoint, send_json};
use crate::{Result, SearchBackend, SearchError, SearchHit, SearchProviderId};
use async_trait::async_trait;
use serde::Deserialize;
use stockcrew_core::ProviderConfig;
use tracing::debug;

/// SerpAPI Google engine
#[derive(Debug, Default, Clone)]
pub struct SerpApiBackend;

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    error: Option<String>,
    #[serde(default)]
    organic_results: Vec<SerpApiResult>,
}

#[derive(Debug, Deserialize)]
struct SerpApiResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl SerpApiResponse {
    fn into_hits(self, count: usize) -> std::result::Result<Vec<SearchHit>, String> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(self
            .organic_results
            .into_iter()
            .take(count)
            .map(|r| SearchHit::new(r.title, r.link, r.snippet, "serpapi"))
            .collect())
    }
}

#[async_trait]
impl SearchBackend for SerpApiBackend {
    async fn search(
        &self,
        config: &ProviderConfig<SearchProviderId>,
        query: &str,
        count: usize,
    ) -> Result<Vec<SearchHit>> {
        let key = config
            .credential()
            .ok_or_else(|| SearchError::ProviderUnavailable(config.identity.to_string()))?;
        let num = count.to_string();
        debug!(query = %query, "SerpAPI search");

        let request = build_client(config)?.get(endpoint(config)?).query(&[
            ("q", query),
            ("api_key", key.expose()),
            ("engine", "google"),
            ("num", num.as_str()),
            ("hl", "pt"),
            ("gl", "br"),
        ]);

        let response: SerpApiResponse = send_json(config.identity, request).await?;
        response
            .into_hits(count)
            .map_err(|e| SearchError::request_failed(config.identity, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_organic_results() {
        let json = r#"{"organic_results": [
            {"position": 1, "title": "Itaú", "link": "https://i.example", "snippet": "Bank"},
            {"position": 2, "title": "ITUB4", "link": "https://j.example", "snippet": "Quote"}
        ]}"#;
        let response: SerpApiResponse = serde_json::from_str(json).unwrap();
        let hits = response.into_hits(1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Itaú");
    }

    #[test]
    fn test_error_payload() {
        let json = r#"{"error": "Invalid API key."}"#;
        let response: SerpApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_hits(5).unwrap_err(), "Invalid API key.");
    }
}
