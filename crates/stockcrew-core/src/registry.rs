//! Provider registry
//!
//! A registry owns the configuration of every configured backend for one
//! [`ProviderKind`]. Providers are discovered from `{PREFIX}_{SETTING}` keys
//! of a [`ConfigSource`]; a provider whose required credential is absent never
//! enters the registry. Registries are built once at startup and are
//! read-only afterwards, so they can be shared behind an `Arc`.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::time::Duration;
use stockcrew_utils::{ConfigError, ConfigSource, Secret};
use tracing::{debug, info, warn};

/// Capability a provider implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    LanguageModel,
    Search,
    MarketData,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LanguageModel => "language model",
            Self::Search => "search",
            Self::MarketData => "market data",
        })
    }
}

/// Optional provider-specific setting beyond the common ones
#[derive(Debug, Clone, Copy)]
pub struct ExtraKey {
    /// Key suffix, read as `{PREFIX}_{suffix}`
    pub suffix: &'static str,
    /// The provider is excluded when a required extra is missing
    pub required: bool,
    pub default: Option<&'static str>,
}

impl ExtraKey {
    pub const fn optional(suffix: &'static str, default: Option<&'static str>) -> Self {
        Self {
            suffix,
            required: false,
            default,
        }
    }

    pub const fn required(suffix: &'static str) -> Self {
        Self {
            suffix,
            required: true,
            default: None,
        }
    }
}

/// Static description of how a provider is configured
#[derive(Debug, Clone, Copy)]
pub struct ProviderSpec {
    /// Prefix of every setting key (e.g. `OPENAI`)
    pub env_prefix: &'static str,
    /// Prefix used for the `_API_KEY` lookup when it differs from `env_prefix`
    pub credential_prefix: Option<&'static str>,
    pub requires_credential: bool,
    /// Value of `{PREFIX}_ENABLED` when the key is unset
    pub enabled_by_default: bool,
    pub default_model: Option<&'static str>,
    pub default_base_url: Option<&'static str>,
    pub default_temperature: Option<f32>,
    pub default_max_results: Option<usize>,
    pub default_timeout_secs: u64,
    pub extra_keys: &'static [ExtraKey],
}

impl ProviderSpec {
    /// Spec for a provider that needs an `{PREFIX}_API_KEY`
    pub const fn credentialed(env_prefix: &'static str) -> Self {
        Self {
            env_prefix,
            credential_prefix: None,
            requires_credential: true,
            enabled_by_default: true,
            default_model: None,
            default_base_url: None,
            default_temperature: None,
            default_max_results: None,
            default_timeout_secs: 30,
            extra_keys: &[],
        }
    }

    /// Spec for a keyless provider, included only when `{PREFIX}_ENABLED` is set
    pub const fn keyless(env_prefix: &'static str) -> Self {
        Self {
            requires_credential: false,
            enabled_by_default: false,
            ..Self::credentialed(env_prefix)
        }
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.env_prefix)
    }

    fn credential_key(&self) -> String {
        format!(
            "{}_API_KEY",
            self.credential_prefix.unwrap_or(self.env_prefix)
        )
    }
}

/// A stable provider name within one [`ProviderKind`]
///
/// Implementors are small `Copy` enums. `ALL` fixes the declaration order,
/// which is the order of [`ProviderRegistry::available`] and of every
/// fallback chain.
pub trait ProviderIdentity:
    Copy + Eq + Hash + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    const KIND: ProviderKind;

    /// Every identity of this kind, in declaration order
    const ALL: &'static [Self];

    /// Stable lowercase name (e.g. "openai")
    fn as_str(&self) -> &'static str;

    fn spec(&self) -> ProviderSpec;

    /// Provider-specific model-name normalization; must be idempotent
    fn normalize_model(&self, raw: &str) -> String {
        raw.to_string()
    }

    /// Case-insensitive lookup by name
    fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str().eq_ignore_ascii_case(name))
    }
}

/// Settings for one configured provider
#[derive(Debug, Clone)]
pub struct ProviderConfig<P> {
    pub identity: P,
    enabled: bool,
    credential: Option<Secret>,
    /// Model name as configured
    pub model: Option<String>,
    /// Model name after provider-specific normalization
    pub normalized_model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
    pub max_results: Option<usize>,
    /// Provider-specific settings keyed by suffix (e.g. `CSE_ID`)
    pub extras: BTreeMap<String, String>,
}

impl<P: ProviderIdentity> ProviderConfig<P> {
    /// Enabled config populated with the provider's built-in defaults
    ///
    /// A provider that needs a credential stays unusable until
    /// [`with_credential`](Self::with_credential) supplies one.
    pub fn new(identity: P) -> Self {
        let spec = identity.spec();
        let model = spec.default_model.map(str::to_string);
        Self {
            identity,
            enabled: true,
            credential: None,
            normalized_model: model.as_deref().map(|m| identity.normalize_model(m)),
            model,
            base_url: spec.default_base_url.map(str::to_string),
            temperature: spec.default_temperature,
            max_tokens: None,
            timeout: Duration::from_secs(spec.default_timeout_secs),
            max_results: spec.default_max_results,
            extras: spec
                .extra_keys
                .iter()
                .filter_map(|k| k.default.map(|d| (k.suffix.to_string(), d.to_string())))
                .collect(),
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_credential(mut self, credential: impl Into<Secret>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        self.normalized_model = Some(self.identity.normalize_model(&model));
        self.model = Some(model);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_extra(mut self, suffix: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(suffix.into(), value.into());
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn credential(&self) -> Option<&Secret> {
        self.credential.as_ref()
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub fn extra(&self, suffix: &str) -> Option<&str> {
        self.extras.get(suffix).map(String::as_str)
    }

    /// Interpret an extra as a boolean flag; unset or unparsable is `false`
    pub fn extra_flag(&self, suffix: &str) -> bool {
        self.extra(suffix).is_some_and(|v| {
            matches!(
                v.to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            )
        })
    }

    /// True when every requirement of the provider spec is met
    pub fn is_usable(&self) -> bool {
        let spec = self.identity.spec();
        self.enabled
            && (!spec.requires_credential || self.has_credential())
            && spec
                .extra_keys
                .iter()
                .filter(|k| k.required)
                .all(|k| self.extras.contains_key(k.suffix))
    }

    /// Build the config for `identity` from `source`
    ///
    /// Returns `Ok(None)` when the provider is disabled or its credential (or
    /// any other required setting) is absent. Malformed values of an otherwise
    /// usable provider are errors.
    pub fn from_source(identity: P, source: &dyn ConfigSource) -> Result<Option<Self>, ConfigError> {
        let spec = identity.spec();

        let enabled = source.get_bool_or(&spec.key("ENABLED"), spec.enabled_by_default)?;
        if !enabled {
            debug!(provider = %identity, "Provider disabled");
            return Ok(None);
        }

        let credential = source.get_string(&spec.credential_key()).map(Secret::from);
        if spec.requires_credential && credential.is_none() {
            debug!(provider = %identity, key = %spec.credential_key(), "Credential missing, provider excluded");
            return Ok(None);
        }

        let mut extras = BTreeMap::new();
        for extra in spec.extra_keys {
            match source
                .get_string(&spec.key(extra.suffix))
                .or_else(|| extra.default.map(str::to_string))
            {
                Some(value) => {
                    extras.insert(extra.suffix.to_string(), value);
                }
                None if extra.required => {
                    debug!(provider = %identity, key = %spec.key(extra.suffix), "Required setting missing, provider excluded");
                    return Ok(None);
                }
                None => {}
            }
        }

        let model = source
            .get_string(&spec.key("MODEL"))
            .or_else(|| spec.default_model.map(str::to_string));

        Ok(Some(Self {
            identity,
            enabled: true,
            credential,
            normalized_model: model.as_deref().map(|m| identity.normalize_model(m)),
            model,
            base_url: source
                .get_string(&spec.key("BASE_URL"))
                .or_else(|| spec.default_base_url.map(str::to_string)),
            temperature: source
                .get_parsed(&spec.key("TEMPERATURE"))?
                .or(spec.default_temperature),
            max_tokens: source.get_parsed(&spec.key("MAX_TOKENS"))?,
            timeout: source.get_secs_or(&spec.key("TIMEOUT"), spec.default_timeout_secs)?,
            max_results: source
                .get_parsed(&spec.key("MAX_RESULTS"))?
                .or(spec.default_max_results),
            extras,
        }))
    }
}

/// Configured providers of one kind plus the default selection
#[derive(Debug, Clone)]
pub struct ProviderRegistry<P: ProviderIdentity> {
    /// Usable configs in declaration order
    entries: Vec<ProviderConfig<P>>,
    configured_default: P,
}

impl<P: ProviderIdentity> ProviderRegistry<P> {
    /// Discover every provider of kind `P` in `source`
    ///
    /// `default_key` names the setting holding the default identity (e.g.
    /// `DEFAULT_LLM`). When it is unset or unknown the first declared identity
    /// is the configured default.
    pub fn load(source: &dyn ConfigSource, default_key: Option<&str>) -> Result<Self, RegistryError> {
        let Some(first_declared) = P::ALL.first().copied() else {
            return Err(RegistryError::NoProviderConfigured { kind: P::KIND });
        };

        let mut entries = Vec::new();
        for &identity in P::ALL {
            if let Some(config) = ProviderConfig::from_source(identity, source)? {
                entries.push(config);
            }
        }

        let configured_default = default_key
            .and_then(|key| source.get_string(key).map(|value| (key, value)))
            .and_then(|(key, value)| {
                let parsed = P::parse(&value);
                if parsed.is_none() {
                    warn!(kind = %P::KIND, key, value = %value, "Unknown default provider, using declaration order");
                }
                parsed
            })
            .unwrap_or(first_declared);

        let registry = Self {
            entries,
            configured_default,
        };
        registry.log_status();
        Ok(registry)
    }

    /// Build a registry from explicit configs
    ///
    /// Configs that are disabled or lack a required credential are dropped,
    /// duplicates keep the first occurrence.
    pub fn from_configs(
        configs: impl IntoIterator<Item = ProviderConfig<P>>,
        configured_default: P,
    ) -> Self {
        let mut entries: Vec<ProviderConfig<P>> = Vec::new();
        for config in configs {
            if !config.is_usable() {
                debug!(provider = %config.identity, "Dropping unusable provider config");
                continue;
            }
            if entries.iter().all(|e| e.identity != config.identity) {
                entries.push(config);
            }
        }
        entries.sort_by_key(|c| Self::declaration_index(c.identity));

        Self {
            entries,
            configured_default,
        }
    }

    fn declaration_index(identity: P) -> usize {
        P::ALL
            .iter()
            .position(|&id| id == identity)
            .unwrap_or(usize::MAX)
    }

    fn log_status(&self) {
        let names: Vec<&str> = self.entries.iter().map(|c| c.identity.as_str()).collect();
        match self.default_identity() {
            Some(default) => info!(
                kind = %P::KIND,
                available = ?names,
                default = %default,
                substituted = self.default_substituted(),
                "Providers loaded"
            ),
            None => warn!(kind = %P::KIND, "No providers configured"),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        P::KIND
    }

    /// Configured identities in declaration order
    pub fn available(&self) -> Vec<P> {
        self.entries.iter().map(|c| c.identity).collect()
    }

    pub fn is_available(&self, identity: P) -> bool {
        self.entries.iter().any(|c| c.identity == identity)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The default named by configuration, whether or not it is available
    pub fn configured_default(&self) -> P {
        self.configured_default
    }

    /// The default actually used: the configured one when available, else the
    /// first available provider. `None` when nothing is configured.
    pub fn default_identity(&self) -> Option<P> {
        if self.is_available(self.configured_default) {
            Some(self.configured_default)
        } else {
            self.entries.first().map(|c| c.identity)
        }
    }

    /// True when the configured default had to be replaced
    pub fn default_substituted(&self) -> bool {
        !self.entries.is_empty() && !self.is_available(self.configured_default)
    }

    /// Strict lookup without any fallback
    pub fn config(&self, identity: P) -> Option<&ProviderConfig<P>> {
        self.entries.iter().find(|c| c.identity == identity)
    }

    pub fn configs(&self) -> impl Iterator<Item = &ProviderConfig<P>> {
        self.entries.iter()
    }

    /// Turn a caller-supplied name (or none) into an available identity
    ///
    /// Unknown names and unavailable providers degrade to the default with a
    /// warning. Fails only when no provider of this kind is configured.
    pub fn resolve_identity(&self, requested: Option<&str>) -> Result<P, RegistryError> {
        let Some(effective_default) = self.default_identity() else {
            return Err(RegistryError::NoProviderConfigured { kind: P::KIND });
        };

        let wanted = match requested {
            None => self.configured_default,
            Some(name) => P::parse(name).unwrap_or_else(|| {
                warn!(kind = %P::KIND, requested = name, "Unknown provider identity, using default");
                self.configured_default
            }),
        };

        if self.is_available(wanted) {
            return Ok(wanted);
        }

        warn!(
            kind = %P::KIND,
            requested = %wanted,
            substituted = %effective_default,
            "Provider not available, substituting"
        );
        Ok(effective_default)
    }

    /// Config for the requested provider, or the default
    pub fn get(&self, requested: Option<&str>) -> Result<&ProviderConfig<P>, RegistryError> {
        let identity = self.resolve_identity(requested)?;
        self.config(identity)
            .ok_or(RegistryError::NoProviderConfigured { kind: P::KIND })
    }

    /// Typed variant of [`get`](Self::get)
    pub fn get_identity(&self, requested: Option<P>) -> Result<&ProviderConfig<P>, RegistryError> {
        self.get(requested.map(|id| id.as_str()))
    }

    /// Fallback chain: the resolved provider first, then every other
    /// available provider in declaration order
    pub fn fallback_order(&self, requested: Option<&str>) -> Vec<P> {
        let Ok(first) = self.resolve_identity(requested) else {
            return Vec::new();
        };
        std::iter::once(first)
            .chain(self.available().into_iter().filter(|&id| id != first))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockcrew_utils::MapSource;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    enum TestProvider {
        Alpha,
        Beta,
        Local,
    }

    impl fmt::Display for TestProvider {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    const BETA_EXTRAS: &[ExtraKey] = &[
        ExtraKey::required("ACCOUNT"),
        ExtraKey::optional("REGION", Some("eu")),
    ];

    impl ProviderIdentity for TestProvider {
        const KIND: ProviderKind = ProviderKind::Search;
        const ALL: &'static [Self] = &[Self::Alpha, Self::Beta, Self::Local];

        fn as_str(&self) -> &'static str {
            match self {
                Self::Alpha => "alpha",
                Self::Beta => "beta",
                Self::Local => "local",
            }
        }

        fn spec(&self) -> ProviderSpec {
            match self {
                Self::Alpha => ProviderSpec {
                    default_model: Some("a-1"),
                    default_temperature: Some(0.1),
                    ..ProviderSpec::credentialed("ALPHA")
                },
                Self::Beta => ProviderSpec {
                    extra_keys: BETA_EXTRAS,
                    ..ProviderSpec::credentialed("BETA")
                },
                Self::Local => ProviderSpec {
                    default_base_url: Some("http://localhost:9000"),
                    ..ProviderSpec::keyless("LOCAL")
                },
            }
        }

        fn normalize_model(&self, raw: &str) -> String {
            match self {
                Self::Local if !raw.starts_with("local/") => format!("local/{raw}"),
                _ => raw.to_string(),
            }
        }
    }

    fn load(pairs: &[(&str, &str)]) -> ProviderRegistry<TestProvider> {
        let source: MapSource = pairs.iter().copied().collect();
        ProviderRegistry::load(&source, Some("DEFAULT_TEST")).unwrap()
    }

    #[test]
    fn test_missing_credential_excludes_provider() {
        let registry = load(&[("BETA_API_KEY", "b"), ("BETA_ACCOUNT", "acc")]);
        assert_eq!(registry.available(), vec![TestProvider::Beta]);
        assert!(!registry.is_available(TestProvider::Alpha));
    }

    #[test]
    fn test_available_never_lists_uncredentialed_providers() {
        let keys = ["ALPHA_API_KEY", "BETA_API_KEY", "BETA_ACCOUNT", "LOCAL_ENABLED"];
        for mask in 0u32..(1 << keys.len()) {
            let pairs: Vec<(&str, &str)> = keys
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, k)| (*k, "true"))
                .collect();
            let registry = load(&pairs);

            for config in registry.configs() {
                let spec = config.identity.spec();
                assert!(!spec.requires_credential || config.has_credential());
                assert!(config.is_usable());
            }
            assert_eq!(registry.is_available(TestProvider::Alpha), mask & 1 != 0);
            assert_eq!(registry.is_available(TestProvider::Beta), mask & 0b110 == 0b110);
            assert_eq!(registry.is_available(TestProvider::Local), mask & 0b1000 != 0);
        }
    }

    #[test]
    fn test_keyless_provider_requires_flag() {
        let registry = load(&[]);
        assert!(registry.is_empty());

        let registry = load(&[("LOCAL_ENABLED", "true"), ("LOCAL_MODEL", "llama")]);
        let config = registry.get(None).unwrap();
        assert_eq!(config.identity, TestProvider::Local);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.normalized_model.as_deref(), Some("local/llama"));
        assert!(!config.has_credential());
    }

    #[test]
    fn test_available_uses_declaration_order() {
        let registry = load(&[
            ("LOCAL_ENABLED", "1"),
            ("ALPHA_API_KEY", "a"),
            ("BETA_API_KEY", "b"),
            ("BETA_ACCOUNT", "acc"),
        ]);
        assert_eq!(
            registry.available(),
            vec![TestProvider::Alpha, TestProvider::Beta, TestProvider::Local]
        );
    }

    #[test]
    fn test_get_none_uses_configured_default() {
        let registry = load(&[
            ("ALPHA_API_KEY", "a"),
            ("LOCAL_ENABLED", "1"),
            ("DEFAULT_TEST", "local"),
        ]);
        assert_eq!(registry.get(None).unwrap().identity, TestProvider::Local);
        assert_eq!(
            registry.get(None).unwrap().identity,
            registry.get(Some("local")).unwrap().identity
        );
        assert!(!registry.default_substituted());
    }

    #[test]
    fn test_unavailable_default_falls_back_to_first_available() {
        let registry = load(&[("LOCAL_ENABLED", "1"), ("DEFAULT_TEST", "beta")]);
        assert_eq!(registry.configured_default(), TestProvider::Beta);
        assert_eq!(registry.default_identity(), Some(TestProvider::Local));
        assert!(registry.default_substituted());
        assert_eq!(registry.get(None).unwrap().identity, TestProvider::Local);
    }

    #[test]
    fn test_unknown_identity_degrades_to_default() {
        let registry = load(&[("ALPHA_API_KEY", "a"), ("LOCAL_ENABLED", "1")]);
        assert_eq!(registry.get(Some("nonsense")).unwrap().identity, TestProvider::Alpha);
        assert_eq!(registry.get(Some("BETA")).unwrap().identity, TestProvider::Alpha);
        assert_eq!(registry.get(Some("LOCAL")).unwrap().identity, TestProvider::Local);
    }

    #[test]
    fn test_unknown_default_setting_uses_first_declared() {
        let registry = load(&[("ALPHA_API_KEY", "a"), ("DEFAULT_TEST", "gamma")]);
        assert_eq!(registry.configured_default(), TestProvider::Alpha);
        assert!(!registry.default_substituted());
    }

    #[test]
    fn test_empty_registry_fails_with_no_provider_configured() {
        let registry = load(&[]);
        let err = registry.get(None).unwrap_err();
        assert_eq!(
            err,
            RegistryError::NoProviderConfigured {
                kind: ProviderKind::Search
            }
        );
        assert!(registry.fallback_order(None).is_empty());
    }

    #[test]
    fn test_required_extra_and_defaults() {
        let registry = load(&[("BETA_API_KEY", "b")]);
        assert!(!registry.is_available(TestProvider::Beta));

        let registry = load(&[("BETA_API_KEY", "b"), ("BETA_ACCOUNT", "acc")]);
        let config = registry.config(TestProvider::Beta).unwrap();
        assert_eq!(config.extra("ACCOUNT"), Some("acc"));
        assert_eq!(config.extra("REGION"), Some("eu"));
    }

    #[test]
    fn test_numeric_settings_and_errors() {
        let registry = load(&[
            ("ALPHA_API_KEY", "a"),
            ("ALPHA_TEMPERATURE", "0.7"),
            ("ALPHA_MAX_TOKENS", "2048"),
            ("ALPHA_TIMEOUT", "90"),
        ]);
        let config = registry.get(None).unwrap();
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.max_tokens, Some(2048));
        assert_eq!(config.timeout, Duration::from_secs(90));

        let source: MapSource = [("ALPHA_API_KEY", "a"), ("ALPHA_TIMEOUT", "soon")]
            .into_iter()
            .collect();
        let result = ProviderRegistry::<TestProvider>::load(&source, None);
        assert!(matches!(result, Err(RegistryError::Config(_))));
    }

    #[test]
    fn test_credential_is_not_printed() {
        let registry = load(&[("ALPHA_API_KEY", "super-secret")]);
        let printed = format!("{:?}", registry.get(None).unwrap());
        assert!(!printed.contains("super-secret"));
        assert_eq!(
            registry.get(None).unwrap().credential().map(Secret::expose),
            Some("super-secret")
        );
    }

    #[test]
    fn test_fallback_order_starts_with_resolved_provider() {
        let registry = load(&[
            ("ALPHA_API_KEY", "a"),
            ("BETA_API_KEY", "b"),
            ("BETA_ACCOUNT", "acc"),
            ("LOCAL_ENABLED", "1"),
        ]);
        assert_eq!(
            registry.fallback_order(Some("beta")),
            vec![TestProvider::Beta, TestProvider::Alpha, TestProvider::Local]
        );
        assert_eq!(
            registry.fallback_order(None),
            vec![TestProvider::Alpha, TestProvider::Beta, TestProvider::Local]
        );
    }

    #[test]
    fn test_new_config_needs_credential_to_be_usable() {
        let alpha = ProviderConfig::new(TestProvider::Alpha);
        assert!(alpha.is_enabled());
        assert!(!alpha.is_usable());
        assert!(alpha.with_credential("a").is_usable());

        let local = ProviderConfig::new(TestProvider::Local);
        assert!(local.is_usable());
        assert!(!local.disabled().is_usable());
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    enum NoProvider {}

    impl fmt::Display for NoProvider {
        fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
            match *self {}
        }
    }

    impl ProviderIdentity for NoProvider {
        const KIND: ProviderKind = ProviderKind::Search;
        const ALL: &'static [Self] = &[];

        fn as_str(&self) -> &'static str {
            match *self {}
        }

        fn spec(&self) -> ProviderSpec {
            match *self {}
        }
    }

    #[test]
    fn test_identity_without_members_loads_as_error() {
        let err = ProviderRegistry::<NoProvider>::load(&MapSource::new(), Some("DEFAULT_X")).unwrap_err();
        assert_eq!(
            err,
            RegistryError::NoProviderConfigured {
                kind: ProviderKind::Search
            }
        );
    }

    #[test]
    fn test_from_configs_drops_unusable_entries() {
        let registry = ProviderRegistry::from_configs(
            [
                ProviderConfig::new(TestProvider::Beta).disabled().with_credential("b").with_extra("ACCOUNT", "x"),
                ProviderConfig::new(TestProvider::Local),
                ProviderConfig::new(TestProvider::Alpha),
                ProviderConfig::new(TestProvider::Alpha).with_credential("a"),
            ],
            TestProvider::Alpha,
        );
        assert_eq!(
            registry.available(),
            vec![TestProvider::Alpha, TestProvider::Local]
        );
        assert!(registry.get(None).unwrap().has_credential());
    }
}
