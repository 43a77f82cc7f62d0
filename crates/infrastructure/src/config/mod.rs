//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP listener, CORS and log output
//! - `cache`: cache backend selection and expiry
//! - `relay`: streaming pacing
//!
//! Completion service settings live in [`ai_core::CompletionConfig`].
//!
//! Sources are layered, later ones winning: built-in defaults, an optional
//! `config.toml` in the working directory, `CHAT_RELAY__*` environment
//! variables, and finally the conventional `OPENAI_API_KEY` and `REDIS_URL`
//! variables.

mod cache;
mod relay;
mod server;

use ai_core::CompletionConfig;
use application::services::RelayConfig;
use config::{ConfigBuilder, ConfigError, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};

pub use cache::{CacheBackend, CacheConfig};
pub use relay::RelaySettings;
pub use server::{LogFormat, ServerConfig};

/// Environment variable prefix for structured overrides
const ENV_PREFIX: &str = "CHAT_RELAY";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion service configuration
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Relay pacing configuration
    #[serde(default)]
    pub relay: RelaySettings,
}

impl AppConfig {
    /// Load configuration from file, environment and defaults
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (e.g., CHAT_RELAY__SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .set_override_option("completion.api_key", env_var("OPENAI_API_KEY"))?
            .set_override_option("cache.redis_url", env_var("REDIS_URL"))?;

        builder.build()?.try_deserialize()
    }

    /// Parse configuration from a TOML document layered over the defaults
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(config::File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("completion.model", "gpt-3.5-turbo")?
            .set_default("cache.redis_url", cache::DEFAULT_REDIS_URL)
    }

    /// Relay timing derived from the cache and relay sections
    pub const fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            cache_ttl: self.cache.ttl(),
            replay_delay: self.relay.replay_delay(),
            fallback_delay: self.relay.fallback_delay(),
        }
    }
}

/// Read an environment variable, treating an empty value as unset
fn env_var(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
