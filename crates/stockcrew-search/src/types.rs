//! Uniform search result shape

use crate::SearchProviderId;
use serde::{Deserialize, Serialize};
use stockcrew_core::FailedAttempt;

/// One search result, whatever backend produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// Backend tag (e.g. "tavily", "tavily_answer", "simulated")
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl SearchHit {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            source: source.into(),
            score: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// Result of [`SearchResolver::search`](crate::SearchResolver::search)
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    /// Provider that answered; `None` for simulated results
    pub provider: Option<SearchProviderId>,
    /// True when every real provider failed and the stub answered
    pub simulated: bool,
    pub hits: Vec<SearchHit>,
    #[serde(skip)]
    pub failures: Vec<FailedAttempt<SearchProviderId>>,
}

impl SearchOutcome {
    /// Numbered plain-text listing, used as agent prompt context
    pub fn to_context_text(&self) -> String {
        let origin = match (self.simulated, self.provider) {
            (true, _) | (false, None) => "simulated, no search provider answered".to_string(),
            (false, Some(provider)) => provider.to_string(),
        };
        let mut text = format!("Search results for '{}' ({origin}):\n", self.query);
        if self.hits.is_empty() {
            text.push_str("No results.\n");
        }
        for (i, hit) in self.hits.iter().enumerate() {
            text.push_str(&format!(
                "{}. {}\n   Link: {}\n   Summary: {}\n",
                i + 1,
                hit.title,
                hit.url,
                hit.snippet
            ));
        }
        text
    }
}
