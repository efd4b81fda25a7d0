//! Process-wide settings, loaded once at startup

use crate::Result;
use serde::Serialize;
use std::sync::Arc;
use stockcrew_core::{ProviderIdentity, ProviderRegistry};
use stockcrew_llm::{LlmProviderId, LlmRegistry};
use stockcrew_market::{DataSource, MarketRegistry};
use stockcrew_search::{SearchProviderId, SearchRegistry};
use stockcrew_utils::{AppConfig, ConfigSource};
use tracing::{info, warn};

pub const DEFAULT_LLM_KEY: &str = "DEFAULT_LLM";
pub const DEFAULT_SEARCH_KEY: &str = "DEFAULT_SEARCH_PROVIDER";

/// Application config plus one registry per provider kind
///
/// Registries are immutable after loading and shared by reference.
#[derive(Debug, Clone)]
pub struct Settings {
    pub app: AppConfig,
    pub llm: Arc<LlmRegistry>,
    pub search: Arc<SearchRegistry>,
    pub market: Arc<MarketRegistry>,
}

/// Availability of one provider kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSummary {
    pub available: Vec<String>,
    pub default: Option<String>,
    pub substituted: bool,
}

impl ProviderSummary {
    fn of<P: ProviderIdentity>(registry: &ProviderRegistry<P>) -> Self {
        Self {
            available: registry.available().iter().map(|p| p.as_str().to_string()).collect(),
            default: registry.default_identity().map(|p| p.as_str().to_string()),
            substituted: registry.default_substituted(),
        }
    }
}

/// Serializable snapshot of the effective configuration
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub app_name: String,
    pub version: String,
    pub environment: String,
    pub llm: ProviderSummary,
    pub search: ProviderSummary,
    pub market_data: ProviderSummary,
    pub alpha_vantage_premium: bool,
    pub cache_enabled: bool,
    pub parallel_tasks: bool,
    pub reports_dir: String,
}

/// Outcome of [`Settings::validate`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Settings {
    /// Load everything from `source`
    ///
    /// Malformed settings fail the load. An empty registry does not; callers
    /// decide which kinds they cannot do without.
    pub fn load(source: &dyn ConfigSource) -> Result<Self> {
        let app = AppConfig::from_source(source)?;
        let llm = LlmRegistry::load(source, Some(DEFAULT_LLM_KEY))?;
        let search = SearchRegistry::load(source, Some(DEFAULT_SEARCH_KEY))?;
        let market = MarketRegistry::load(source, None)?;

        Ok(Self {
            app,
            llm: Arc::new(llm),
            search: Arc::new(search),
            market: Arc::new(market),
        })
    }

    pub fn alpha_vantage_premium(&self) -> bool {
        self.market
            .config(DataSource::AlphaVantage)
            .is_some_and(|c| c.extra_flag("PREMIUM"))
    }

    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            app_name: self.app.app_name.clone(),
            version: self.app.version.clone(),
            environment: self.app.environment.clone(),
            llm: ProviderSummary::of(&*self.llm),
            search: ProviderSummary::of(&*self.search),
            market_data: ProviderSummary::of(&*self.market),
            alpha_vantage_premium: self.alpha_vantage_premium(),
            cache_enabled: self.app.cache_enabled,
            parallel_tasks: self.app.parallel_tasks,
            reports_dir: self.app.reports_dir.display().to_string(),
        }
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        if self.llm.is_empty() {
            report.errors.push(
                "No language model provider configured (set OPENAI_API_KEY, ANTHROPIC_API_KEY, \
                 DEEPSEEK_API_KEY, GROK_API_KEY or OLLAMA_ENABLED=true)"
                    .to_string(),
            );
        } else if !self.llm.is_available(LlmProviderId::OpenAI) && !self.llm.is_available(LlmProviderId::Anthropic) {
            report
                .warnings
                .push("Neither OpenAI nor Anthropic is configured".to_string());
        }

        if self.search.is_empty() {
            report
                .warnings
                .push("No search provider configured; research will use simulated results".to_string());
        }

        for (kind, substituted, configured) in [
            ("language model", self.llm.default_substituted(), self.llm.configured_default().as_str()),
            ("search", self.search.default_substituted(), self.search.configured_default().as_str()),
        ] {
            if substituted {
                report
                    .warnings
                    .push(format!("Default {kind} provider '{configured}' is not available"));
            }
        }

        report
    }

    pub fn recommendations(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.llm.is_available(LlmProviderId::OpenAI) {
            out.push("Set OPENAI_API_KEY for the best general performance".to_string());
        }
        if !self.llm.is_available(LlmProviderId::Anthropic) {
            out.push("Set ANTHROPIC_API_KEY for more detailed analyses".to_string());
        }
        if !self.search.is_available(SearchProviderId::Google) {
            out.push("Set GOOGLE_API_KEY and GOOGLE_CSE_ID for a robust search fallback".to_string());
        }
        if !self.market.is_available(DataSource::Mcp) && !self.market.is_available(DataSource::AlphaVantage) {
            out.push("Set ALPHA_VANTAGE_API_KEY for more complete financial data".to_string());
        }
        out
    }

    /// Log the startup status
    pub fn log_status(&self) {
        let summary = self.summary();
        info!(
            app = %summary.app_name,
            version = %summary.version,
            environment = %summary.environment,
            "Configuration loaded"
        );
        info!(
            llm = ?summary.llm.available,
            search = ?summary.search.available,
            market_data = ?summary.market_data.available,
            default_llm = ?summary.llm.default,
            default_search = ?summary.search.default,
            alpha_vantage_premium = summary.alpha_vantage_premium,
            "Providers"
        );
        for warning in self.validate().warnings {
            warn!("{warning}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorkflowError;
    use stockcrew_utils::{ConfigError, MapSource};

    #[test]
    fn test_empty_environment() {
        let settings = Settings::load(&MapSource::new()).unwrap();
        let report = settings.validate();

        assert!(!report.is_valid());
        assert!(report.errors[0].starts_with("No language model provider"));
        assert!(report.warnings.iter().any(|w| w.contains("simulated results")));
        // Yahoo needs no key
        assert_eq!(settings.summary().market_data.available, vec!["market_data_base"]);
    }

    #[test]
    fn test_default_substitution_is_reported() {
        let source = MapSource::new()
            .with("ANTHROPIC_API_KEY", "sk-ant")
            .with("DEFAULT_LLM", "openai")
            .with("TAVILY_API_KEY", "tv");
        let settings = Settings::load(&source).unwrap();

        let summary = settings.summary();
        assert_eq!(summary.llm.default.as_deref(), Some("anthropic"));
        assert!(summary.llm.substituted);
        assert_eq!(summary.search.default.as_deref(), Some("tavily"));

        let report = settings.validate();
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.contains("'openai'")));
    }

    #[test]
    fn test_recommendations() {
        let source = MapSource::new()
            .with("OPENAI_API_KEY", "sk")
            .with("ALPHA_VANTAGE_API_KEY", "av");
        let settings = Settings::load(&source).unwrap();
        let recs = settings.recommendations();

        assert!(recs.iter().any(|r| r.contains("ANTHROPIC_API_KEY")));
        assert!(recs.iter().any(|r| r.contains("GOOGLE_CSE_ID")));
        assert!(!recs.iter().any(|r| r.contains("OPENAI_API_KEY")));
        assert!(!recs.iter().any(|r| r.contains("ALPHA_VANTAGE")));
    }

    #[test]
    fn test_malformed_setting_fails_load() {
        let source = MapSource::new().with("CACHE_TTL", "soon");
        let err = Settings::load(&source).unwrap_err();
        assert!(matches!(err, WorkflowError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_premium_flag() {
        let source = MapSource::new()
            .with("ALPHA_VANTAGE_API_KEY", "av")
            .with("ALPHA_VANTAGE_ENABLED", "true")
            .with("ALPHA_VANTAGE_PREMIUM", "true");
        let settings = Settings::load(&source).unwrap();
        assert!(settings.alpha_vantage_premium());
    }
}
