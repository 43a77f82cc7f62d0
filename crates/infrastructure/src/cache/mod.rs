//! Cache implementations
//!
//! Provides `CachePort` adapters for the relay:
//! - `RedisCache`: shared Redis store, connected lazily
//! - `MokaCache`: process-local in-memory cache with per-entry expiry
//! - `DisabledCache`: always misses, never stores

mod disabled_cache;
mod moka_cache;
mod redis_cache;

use std::sync::Arc;

use application::ports::{CachePort, CacheWrite};
use tracing::{info, warn};

pub use disabled_cache::DisabledCache;
pub use moka_cache::MokaCache;
pub use redis_cache::RedisCache;

use crate::config::{CacheBackend, CacheConfig};

/// Build the cache adapter selected by configuration.
///
/// Never fails: a Redis URL that cannot be parsed degrades to
/// [`DisabledCache`] so the service still starts.
pub fn build_cache(config: &CacheConfig) -> Arc<dyn CachePort> {
    match config.backend {
        CacheBackend::Redis => {
            match RedisCache::open(&config.redis_url, config.redis_timeout()) {
                Ok(cache) => Arc::new(cache),
                Err(e) => {
                    warn!(error = %e, "Invalid Redis URL, caching disabled");
                    Arc::new(DisabledCache)
                },
            }
        },
        CacheBackend::Memory => Arc::new(MokaCache::new(config.memory_max_entries)),
        CacheBackend::Disabled => Arc::new(DisabledCache),
    }
}

/// Check cache reachability once at startup and log the outcome.
///
/// An unreachable store is reported but never prevents startup.
pub async fn probe_cache(cache: &dyn CachePort) -> bool {
    match cache.ping().await {
        CacheWrite::Stored => {
            info!(backend = cache.backend(), "Cache reachable");
            true
        },
        CacheWrite::Unavailable(reason) => {
            warn!(
                backend = cache.backend(),
                reason = %reason,
                "Cache unreachable, continuing without it until it recovers"
            );
            false
        },
    }
}
