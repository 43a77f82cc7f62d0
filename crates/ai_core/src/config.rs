//! Configuration for the completion service client

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Configuration for the completion service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model requested for every completion
    #[serde(default = "default_model")]
    pub model: String,

    /// API credential; requests fail locally when absent
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Optional request timeout in milliseconds (no timeout when unset)
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Sampling temperature forwarded to the service when set
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate when set
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_ms: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

impl CompletionConfig {
    /// Create a config with the given credential and default endpoint
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            ..Default::default()
        }
    }

    /// Point the client at another OpenAI-compatible endpoint
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The configured credential, ignoring an empty value
    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().is_empty())
    }

    /// Whether a usable credential is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = CompletionConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert!(config.api_key.is_none());
        assert!(config.timeout_ms.is_none());
        assert!(!config.has_api_key());
    }

    #[test]
    fn builder_methods_override_fields() {
        let config = CompletionConfig::with_api_key("sk-test")
            .with_base_url("http://localhost:9999/v1")
            .with_model("gpt-4o-mini");
        assert!(config.has_api_key());
        assert_eq!(config.base_url, "http://localhost:9999/v1");
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let config = CompletionConfig::with_api_key("");
        assert!(config.api_key.is_some());
        assert!(config.api_key().is_none());
        assert!(!config.has_api_key());
    }

    #[test]
    fn api_key_is_redacted_in_debug() {
        let config = CompletionConfig::with_api_key("sk-very-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
    }

    #[test]
    fn api_key_is_never_serialized() {
        let config = CompletionConfig::with_api_key("sk-very-secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("api_key"));
        assert!(!json.contains("sk-very-secret"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: CompletionConfig = serde_json::from_str(r#"{"model":"gpt-4o"}"#).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
    }
}
