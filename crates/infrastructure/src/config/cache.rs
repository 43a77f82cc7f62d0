//! Cache backend configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub(super) const DEFAULT_REDIS_URL: &str = "redis://localhost:6379/0";

/// Which store backs the relay cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Shared Redis instance
    #[default]
    Redis,
    /// Process-local in-memory cache
    Memory,
    /// No caching at all
    Disabled,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Backend selection
    #[serde(default)]
    pub backend: CacheBackend,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Expiry for cached responses in seconds (default: 1 hour)
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Maximum number of entries in the in-memory backend
    #[serde(default = "default_memory_max_entries")]
    pub memory_max_entries: u64,

    /// Upper bound on connecting to Redis and on each command, in milliseconds
    #[serde(default = "default_redis_timeout")]
    pub redis_timeout_ms: u64,
}

fn default_redis_url() -> String {
    DEFAULT_REDIS_URL.to_string()
}

const fn default_ttl() -> u64 {
    60 * 60 // 1 hour
}

const fn default_memory_max_entries() -> u64 {
    10_000
}

const fn default_redis_timeout() -> u64 {
    2_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            redis_url: default_redis_url(),
            ttl_secs: default_ttl(),
            memory_max_entries: default_memory_max_entries(),
            redis_timeout_ms: default_redis_timeout(),
        }
    }
}

impl CacheConfig {
    /// Entry expiry as a Duration
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Redis connect and command timeout as a Duration
    pub const fn redis_timeout(&self) -> Duration {
        Duration::from_millis(self.redis_timeout_ms)
    }
}
