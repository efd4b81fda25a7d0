//! HTTP search backends

mod google;
mod searxng;
mod serpapi;
mod tavily;

pub use google::GoogleBackend;
pub use searxng::SearxngBackend;
pub use serpapi::SerpApiBackend;
pub use tavily::TavilyBackend;

use crate::{Result, SearchError, SearchProviderId};
use serde::de::DeserializeOwned;
use stockcrew_core::ProviderConfig;

pub(crate) fn build_client(config: &ProviderConfig<SearchProviderId>) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| SearchError::request_failed(config.identity, e))
}

pub(crate) fn endpoint(config: &ProviderConfig<SearchProviderId>) -> Result<&str> {
    config
        .base_url
        .as_deref()
        .ok_or_else(|| SearchError::request_failed(config.identity, "no base URL configured"))
}

/// Send the request and decode a JSON body, mapping every failure to `RequestFailed`
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: SearchProviderId,
    request: reqwest::RequestBuilder,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| SearchError::request_failed(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SearchError::request_failed(
            provider,
            format!("HTTP {status}: {}", stockcrew_core::step::truncate(&body, 200)),
        ));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| SearchError::request_failed(provider, format!("invalid response payload: {e}")))
}
