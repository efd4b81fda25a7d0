//! Language-model provider identities

use serde::{Deserialize, Serialize};
use std::fmt;
use stockcrew_core::{ProviderIdentity, ProviderKind, ProviderSpec};

const DEFAULT_TEMPERATURE: f32 = 0.1;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Known language-model backends, in fallback order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderId {
    OpenAI,
    Anthropic,
    DeepSeek,
    Grok,
    Ollama,
}

impl LlmProviderId {
    /// Namespace prefix the model name must carry for this provider
    pub fn route_prefix(self) -> Option<&'static str> {
        match self {
            Self::DeepSeek => Some("deepseek/"),
            Self::Grok => Some("xai/"),
            Self::Ollama => Some("ollama/"),
            Self::OpenAI | Self::Anthropic => None,
        }
    }

    /// Cargo feature that compiles this provider's client
    pub fn feature(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::Ollama => "ollama",
            Self::OpenAI | Self::DeepSeek | Self::Grok => "openai",
        }
    }
}

impl fmt::Display for LlmProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProviderIdentity for LlmProviderId {
    const KIND: ProviderKind = ProviderKind::LanguageModel;
    const ALL: &'static [Self] = &[
        Self::OpenAI,
        Self::Anthropic,
        Self::DeepSeek,
        Self::Grok,
        Self::Ollama,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::DeepSeek => "deepseek",
            Self::Grok => "grok",
            Self::Ollama => "ollama",
        }
    }

    fn spec(&self) -> ProviderSpec {
        let (prefix, model, base_url) = match self {
            Self::OpenAI => ("OPENAI", "gpt-4o", "https://api.openai.com/v1"),
            Self::Anthropic => (
                "ANTHROPIC",
                "claude-3-5-sonnet-20241022",
                "https://api.anthropic.com/v1",
            ),
            Self::DeepSeek => ("DEEPSEEK", "deepseek-reasoner", "https://api.deepseek.com/v1"),
            Self::Grok => ("GROK", "grok-2-1212", "https://api.x.ai/v1"),
            Self::Ollama => ("OLLAMA", "llama3.2:latest", "http://localhost:11434"),
        };
        let base = if matches!(self, Self::Ollama) {
            ProviderSpec::keyless(prefix)
        } else {
            ProviderSpec::credentialed(prefix)
        };

        ProviderSpec {
            default_model: Some(model),
            default_base_url: Some(base_url),
            default_temperature: Some(DEFAULT_TEMPERATURE),
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
            ..base
        }
    }

    fn normalize_model(&self, raw: &str) -> String {
        normalize_model(*self, raw)
    }
}

/// Namespace `raw` for `provider` when the provider requires it
///
/// Pure and idempotent: a name that already carries the prefix is returned
/// unchanged.
///
/// ```
/// use stockcrew_llm::{LlmProviderId, normalize_model};
///
/// assert_eq!(normalize_model(LlmProviderId::DeepSeek, "deepseek-chat"), "deepseek/deepseek-chat");
/// assert_eq!(normalize_model(LlmProviderId::DeepSeek, "deepseek/deepseek-chat"), "deepseek/deepseek-chat");
/// assert_eq!(normalize_model(LlmProviderId::OpenAI, "gpt-4o"), "gpt-4o");
/// ```
pub fn normalize_model(provider: LlmProviderId, raw: &str) -> String {
    match provider.route_prefix() {
        Some(prefix) if !raw.starts_with(prefix) => format!("{prefix}{raw}"),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "gpt-4o",
        "deepseek-reasoner",
        "deepseek/deepseek-chat",
        "xai/grok-2-1212",
        "grok-2-1212",
        "ollama/llama3.2:latest",
        "llama3.2:latest",
        "DeepSeek/upper",
        "a/b/c",
        "  spaced  ",
    ];

    #[test]
    fn test_normalization_is_idempotent() {
        for &provider in LlmProviderId::ALL {
            for &raw in SAMPLES {
                let once = normalize_model(provider, raw);
                assert_eq!(normalize_model(provider, &once), once, "{provider} {raw:?}");
            }
        }
    }

    #[test]
    fn test_prefixed_inputs_are_unchanged() {
        for &provider in LlmProviderId::ALL {
            if let Some(prefix) = provider.route_prefix() {
                let prefixed = format!("{prefix}model-x");
                assert_eq!(normalize_model(provider, &prefixed), prefixed);
            }
        }
    }

    #[test]
    fn test_prefix_per_provider() {
        assert_eq!(normalize_model(LlmProviderId::Grok, "grok-2-1212"), "xai/grok-2-1212");
        assert_eq!(
            normalize_model(LlmProviderId::Ollama, "llama3.2:latest"),
            "ollama/llama3.2:latest"
        );
        assert_eq!(
            normalize_model(LlmProviderId::Anthropic, "claude-3-5-sonnet-20241022"),
            "claude-3-5-sonnet-20241022"
        );
    }

    #[test]
    fn test_parse_identity() {
        assert_eq!(LlmProviderId::parse("DeepSeek"), Some(LlmProviderId::DeepSeek));
        assert_eq!(LlmProviderId::parse(" openai "), Some(LlmProviderId::OpenAI));
        assert_eq!(LlmProviderId::parse("mistral"), None);
    }

    #[test]
    fn test_only_ollama_is_keyless() {
        for &provider in LlmProviderId::ALL {
            let spec = provider.spec();
            assert_eq!(spec.requires_credential, provider != LlmProviderId::Ollama);
            assert_eq!(spec.default_timeout_secs, 120);
        }
    }
}
