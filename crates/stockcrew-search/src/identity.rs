//! Search provider identities

use serde::{Deserialize, Serialize};
use std::fmt;
use stockcrew_core::{ExtraKey, ProviderIdentity, ProviderKind, ProviderSpec};

const DEFAULT_MAX_RESULTS: usize = 10;

const SEARXNG_EXTRAS: &[ExtraKey] = &[
    ExtraKey::optional("LANGUAGE", Some("pt-BR")),
    ExtraKey::optional("SAFE_SEARCH", Some("0")),
    ExtraKey::optional("CATEGORIES", Some("general,news")),
];

const GOOGLE_EXTRAS: &[ExtraKey] = &[ExtraKey::required("CSE_ID")];

/// Known search backends, in fallback order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProviderId {
    Searxng,
    Tavily,
    Google,
    SerpApi,
}

impl fmt::Display for SearchProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProviderIdentity for SearchProviderId {
    const KIND: ProviderKind = ProviderKind::Search;
    const ALL: &'static [Self] = &[Self::Searxng, Self::Tavily, Self::Google, Self::SerpApi];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Searxng => "searxng",
            Self::Tavily => "tavily",
            Self::Google => "google",
            Self::SerpApi => "serpapi",
        }
    }

    fn spec(&self) -> ProviderSpec {
        let base = match self {
            Self::Searxng => ProviderSpec {
                default_base_url: Some("http://localhost:8080"),
                default_timeout_secs: 30,
                extra_keys: SEARXNG_EXTRAS,
                ..ProviderSpec::keyless("SEARXNG")
            },
            Self::Tavily => ProviderSpec {
                default_base_url: Some("https://api.tavily.com/search"),
                default_timeout_secs: 10,
                ..ProviderSpec::credentialed("TAVILY")
            },
            Self::Google => ProviderSpec {
                default_base_url: Some("https://www.googleapis.com/customsearch/v1"),
                default_timeout_secs: 10,
                extra_keys: GOOGLE_EXTRAS,
                ..ProviderSpec::credentialed("GOOGLE")
            },
            Self::SerpApi => ProviderSpec {
                default_base_url: Some("https://serpapi.com/search"),
                default_timeout_secs: 10,
                ..ProviderSpec::credentialed("SERPAPI")
            },
        };
        ProviderSpec {
            default_max_results: Some(DEFAULT_MAX_RESULTS),
            ..base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockcrew_core::ProviderRegistry;
    use stockcrew_utils::MapSource;

    #[test]
    fn test_google_needs_engine_id() {
        let source: MapSource = [("GOOGLE_API_KEY", "g")].into_iter().collect();
        let registry = ProviderRegistry::<SearchProviderId>::load(&source, None).unwrap();
        assert!(registry.is_empty());

        let source = source.with("GOOGLE_CSE_ID", "cx");
        let registry = ProviderRegistry::<SearchProviderId>::load(&source, None).unwrap();
        assert_eq!(registry.available(), vec![SearchProviderId::Google]);
    }

    #[test]
    fn test_searxng_defaults() {
        let source: MapSource = [("SEARXNG_ENABLED", "true")].into_iter().collect();
        let registry =
            ProviderRegistry::<SearchProviderId>::load(&source, Some("DEFAULT_SEARCH_PROVIDER")).unwrap();
        let config = registry.get(None).unwrap();

        assert_eq!(config.identity, SearchProviderId::Searxng);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.extra("LANGUAGE"), Some("pt-BR"));
        assert_eq!(config.max_results, Some(10));
    }
}
