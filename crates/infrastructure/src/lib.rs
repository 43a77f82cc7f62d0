//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the Redis and
//! in-memory caches, the OpenAI completion adapter, configuration loading
//! and logging setup.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod telemetry;
#[cfg(test)]
pub mod testing;

pub use adapters::OpenAiInferenceAdapter;
pub use cache::{DisabledCache, MokaCache, RedisCache, build_cache, probe_cache};
pub use config::{AppConfig, CacheBackend, CacheConfig, LogFormat, RelaySettings, ServerConfig};
pub use telemetry::{DEFAULT_LOG_FILTER, init_logging};
