//! Google Programmable Search backend

use super::{build_client, endpoint, send_json};
use crate::{Result, SearchBackend, SearchError, SearchHit, SearchProviderId};
use async_trait::async_trait;
use serde::Deserialize;
use stockcrew_core::ProviderConfig;
use tracing::debug;

/// Google Custom Search JSON API returns at most this many items per call
const MAX_PAGE_SIZE: usize = 10;

/// Google Custom Search (requires an API key and a search engine id)
#[derive(Debug, Default, Clone)]
pub struct GoogleBackend;

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl GoogleResponse {
    fn into_hits(self, count: usize) -> Vec<SearchHit> {
        self.items
            .into_iter()
            .take(count)
            .map(|i| SearchHit::new(i.title, i.link, i.snippet, "google"))
            .collect()
    }
}

#[async_trait]
impl SearchBackend for GoogleBackend {
    async fn search(
        &self,
        config: &ProviderConfig<SearchProviderId>,
        query: &str,
        count: usize,
    ) -> Result<Vec<SearchHit>> {
        let unavailable = || SearchError::ProviderUnavailable(config.identity.to_string());
        let key = config.credential().ok_or_else(unavailable)?;
        let cse_id = config.extra("CSE_ID").ok_or_else(unavailable)?;
        let num = count.clamp(1, MAX_PAGE_SIZE).to_string();
        debug!(query = %query, num = %num, "Google search");

        let request = build_client(config)?.get(endpoint(config)?).query(&[
            ("key", key.expose()),
            ("cx", cse_id),
            ("q", query),
            ("num", num.as_str()),
            ("hl", "pt-BR"),
            ("gl", "br"),
        ]);

        let response: GoogleResponse = send_json(config.identity, request).await?;
        Ok(response.into_hits(count))
    }
}
