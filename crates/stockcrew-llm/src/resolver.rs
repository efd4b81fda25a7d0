//! Language-model resolver
//!
//! Turns a provider identity (or none, meaning "the default") into a
//! [`ClientHandle`]. Construction is driven by a registration table of
//! [`ClientStrategy`] entries, one per provider; adding a provider means
//! adding an entry. Resolving never performs network I/O.

use crate::completion::DEFAULT_MAX_TOKENS;
use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, LlmProviderId, LlmRegistry,
    Message, Result, normalize_model,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use stockcrew_core::ProviderIdentity;
use stockcrew_utils::Secret;
use tracing::{debug, info, instrument};

/// Connection settings handed to a construction strategy
#[derive(Debug, Clone, Copy)]
pub struct ClientSettings<'a> {
    pub provider: LlmProviderId,
    pub api_key: Option<&'a Secret>,
    pub base_url: Option<&'a str>,
    pub timeout: Duration,
}

/// Builds the HTTP client for one provider
pub type BuildClient = fn(&ClientSettings<'_>) -> Result<Arc<dyn LLMProvider>>;

/// Registration-table entry
#[derive(Clone, Copy)]
pub struct ClientStrategy {
    pub provider: LlmProviderId,
    pub build: BuildClient,
}

impl fmt::Debug for ClientStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientStrategy")
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

impl ClientStrategy {
    /// The built-in strategies for every known provider
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                provider: LlmProviderId::OpenAI,
                build: build_openai_compatible,
            },
            Self {
                provider: LlmProviderId::Anthropic,
                build: build_anthropic,
            },
            Self {
                provider: LlmProviderId::DeepSeek,
                build: build_openai_compatible,
            },
            Self {
                provider: LlmProviderId::Grok,
                build: build_openai_compatible,
            },
            Self {
                provider: LlmProviderId::Ollama,
                build: build_ollama,
            },
        ]
    }
}

#[cfg(not(all(feature = "anthropic", feature = "openai", feature = "ollama")))]
fn missing_dependency(provider: LlmProviderId) -> LLMError {
    LLMError::MissingDependency {
        provider: provider.to_string(),
        feature: provider.feature(),
    }
}

#[cfg_attr(not(any(feature = "anthropic", feature = "openai")), allow(dead_code))]
fn require_key<'a>(settings: &ClientSettings<'a>) -> Result<&'a Secret> {
    settings.api_key.ok_or_else(|| {
        LLMError::Registry(stockcrew_core::RegistryError::ProviderUnavailable {
            kind: LlmProviderId::KIND,
            identity: settings.provider.to_string(),
        })
    })
}

#[cfg(feature = "anthropic")]
fn build_anthropic(settings: &ClientSettings<'_>) -> Result<Arc<dyn LLMProvider>> {
    use crate::providers::{AnthropicConfig, AnthropicProvider};

    let mut config = AnthropicConfig::new(require_key(settings)?.clone()).with_timeout(settings.timeout);
    if let Some(base_url) = settings.base_url {
        config = config.with_api_base(base_url);
    }
    Ok(Arc::new(AnthropicProvider::with_config(config)?))
}

#[cfg(not(feature = "anthropic"))]
fn build_anthropic(settings: &ClientSettings<'_>) -> Result<Arc<dyn LLMProvider>> {
    Err(missing_dependency(settings.provider))
}

#[cfg(feature = "openai")]
fn build_openai_compatible(settings: &ClientSettings<'_>) -> Result<Arc<dyn LLMProvider>> {
    use crate::providers::{OpenAIConfig, OpenAIProvider};

    let mut config = OpenAIConfig::new(require_key(settings)?.clone())
        .with_timeout(settings.timeout)
        .with_provider_name(settings.provider.as_str());
    if let Some(base_url) = settings.base_url {
        config = config.with_api_base(base_url);
    }
    Ok(Arc::new(OpenAIProvider::with_config(config)?))
}

#[cfg(not(feature = "openai"))]
fn build_openai_compatible(settings: &ClientSettings<'_>) -> Result<Arc<dyn LLMProvider>> {
    Err(missing_dependency(settings.provider))
}

#[cfg(feature = "ollama")]
fn build_ollama(settings: &ClientSettings<'_>) -> Result<Arc<dyn LLMProvider>> {
    use crate::providers::{OpenAIConfig, OpenAIProvider};

    let base = settings
        .base_url
        .unwrap_or("http://localhost:11434")
        .trim_end_matches('/');
    let api_base = if base.ends_with("/v1") {
        base.to_string()
    } else {
        format!("{base}/v1")
    };

    let mut config = OpenAIConfig::keyless(api_base)
        .with_timeout(settings.timeout)
        .with_provider_name("ollama");
    config.api_key = settings.api_key.cloned();
    Ok(Arc::new(OpenAIProvider::with_config(config)?))
}

#[cfg(not(feature = "ollama"))]
fn build_ollama(settings: &ClientSettings<'_>) -> Result<Arc<dyn LLMProvider>> {
    Err(missing_dependency(settings.provider))
}

/// A ready-to-call language-model client
#[derive(Clone)]
pub struct ClientHandle {
    pub provider: LlmProviderId,
    /// Normalized (namespaced) model name
    pub model: String,
    credential: Option<Secret>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: u32,
    pub timeout: Duration,
    client: Arc<dyn LLMProvider>,
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHandle")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("credential_present", &self.credential.is_some())
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ClientHandle {
    pub fn credential(&self) -> Option<&Secret> {
        self.credential.as_ref()
    }

    /// Model name as sent on the wire, without the routing namespace
    pub fn wire_model(&self) -> &str {
        self.provider
            .route_prefix()
            .and_then(|prefix| self.model.strip_prefix(prefix))
            .unwrap_or(&self.model)
    }

    /// The underlying provider client
    pub fn client(&self) -> Arc<dyn LLMProvider> {
        Arc::clone(&self.client)
    }

    /// Request carrying this handle's model and tuning
    pub fn request(&self, system: Option<&str>, prompt: impl Into<String>) -> CompletionRequest {
        let mut builder = CompletionRequest::builder(self.wire_model())
            .add_message(Message::user(prompt))
            .max_tokens(self.max_tokens)
            .temperature(self.temperature);
        if let Some(system) = system {
            builder = builder.system(system);
        }
        builder.build()
    }

    /// Single-turn completion
    pub async fn complete(
        &self,
        system: Option<&str>,
        prompt: impl Into<String>,
    ) -> Result<CompletionResponse> {
        self.client.complete(self.request(system, prompt)).await
    }
}

/// Resolves language-model providers into client handles
pub struct LlmResolver {
    registry: Arc<LlmRegistry>,
    strategies: HashMap<LlmProviderId, ClientStrategy>,
}

impl LlmResolver {
    /// Resolver with the built-in strategy table
    pub fn new(registry: Arc<LlmRegistry>) -> Self {
        Self::with_strategies(registry, ClientStrategy::defaults())
    }

    /// Resolver with an explicit strategy table
    pub fn with_strategies(
        registry: Arc<LlmRegistry>,
        strategies: impl IntoIterator<Item = ClientStrategy>,
    ) -> Self {
        Self {
            registry,
            strategies: strategies.into_iter().map(|s| (s.provider, s)).collect(),
        }
    }

    /// Add or replace the strategy for one provider
    pub fn register(&mut self, strategy: ClientStrategy) {
        self.strategies.insert(strategy.provider, strategy);
    }

    pub fn registry(&self) -> &LlmRegistry {
        &self.registry
    }

    /// Build a client for the requested provider, or the default one
    #[instrument(skip(self))]
    pub fn resolve(&self, requested: Option<&str>) -> Result<ClientHandle> {
        let config = self.registry.get(requested)?;
        let provider = config.identity;

        let strategy = self
            .strategies
            .get(&provider)
            .ok_or_else(|| LLMError::UnsupportedProvider(provider.to_string()))?;

        let raw_model = config
            .model
            .clone()
            .or_else(|| provider.spec().default_model.map(str::to_string))
            .ok_or_else(|| LLMError::InvalidRequest(format!("No model configured for {provider}")))?;
        let model = normalize_model(provider, &raw_model);

        let settings = ClientSettings {
            provider,
            api_key: config.credential(),
            base_url: config.base_url.as_deref(),
            timeout: config.timeout,
        };
        let client = (strategy.build)(&settings)?;
        debug!(provider = %provider, client = client.name(), "Client constructed");

        let handle = ClientHandle {
            provider,
            model,
            credential: config.credential().cloned(),
            base_url: config.base_url.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout: config.timeout,
            client,
        };
        info!(provider = %handle.provider, model = %handle.model, "Language model resolved");
        Ok(handle)
    }
}
