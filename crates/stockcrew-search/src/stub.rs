//! Offline search answer

use crate::SearchHit;

/// Source tag carried by every simulated hit
pub const SIMULATED_SOURCE: &str = "simulated";

/// Deterministic placeholder results for `query`
///
/// Returns at most three hits, none when `count` is 0, each tagged
/// [`SIMULATED_SOURCE`].
pub fn simulated_hits(query: &str, count: usize) -> Vec<SearchHit> {
    [
        (
            format!("Relevant results about {query}"),
            "https://example.com/result1",
            format!("General information and market commentary about {query}."),
        ),
        (
            format!("Market analysis - {query}"),
            "https://example.com/result2",
            format!("Technical and fundamental analysis of {query}."),
        ),
        (
            format!("Recent news - {query}"),
            "https://example.com/result3",
            format!("Latest news and moves related to {query}."),
        ),
    ]
    .into_iter()
    .take(count)
    .map(|(title, url, snippet)| SearchHit::new(title, url, snippet, SIMULATED_SOURCE))
    .collect()
}
