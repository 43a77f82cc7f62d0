//! Moka in-memory cache implementation
//!
//! Thread-safe, process-local cache for single-instance deployments and
//! tests. Entries carry their own expiry, so the TTL passed to `set` is
//! honored per entry rather than fixed at build time.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use application::ports::{CacheLookup, CachePort, CacheWrite};
use async_trait::async_trait;
use domain::CacheKey;
use moka::{Expiry, future::Cache};
use tracing::{debug, instrument};

/// Stored value together with the expiry requested for it
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Moka-based in-memory cache
pub struct MokaCache {
    cache: Cache<String, Entry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for MokaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entries", &self.cache.entry_count())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl MokaCache {
    /// Create a cache holding at most `max_entries` entries
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();

        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Lookups answered from the cache so far
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that found nothing so far
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

impl Default for MokaCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl CachePort for MokaCache {
    #[instrument(skip(self, key), fields(namespace = %key.namespace()), level = "debug")]
    async fn get(&self, key: &CacheKey) -> CacheLookup {
        match self.cache.get(key.as_str()).await {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit");
                CacheLookup::Hit(entry.value)
            },
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Cache miss");
                CacheLookup::Miss
            },
        }
    }

    #[instrument(skip(self, key, value), fields(namespace = %key.namespace()), level = "debug")]
    async fn set(&self, key: &CacheKey, value: String, ttl: Duration) -> CacheWrite {
        self.cache
            .insert(key.as_str().to_string(), Entry { value, ttl })
            .await;
        debug!(ttl_secs = ttl.as_secs(), "Cache set");
        CacheWrite::Stored
    }

    async fn ping(&self) -> CacheWrite {
        CacheWrite::Stored
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use domain::Prompt;

    use super::*;

    fn key(prompt: &str) -> CacheKey {
        CacheKey::response(&Prompt::from(prompt))
    }

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let cache = MokaCache::default();
        let write = cache
            .set(&key("hello"), "world".to_string(), Duration::from_secs(60))
            .await;

        assert!(write.is_stored());
        assert_eq!(
            cache.get(&key("hello")).await,
            CacheLookup::Hit("world".to_string())
        );
        assert_eq!(cache.hits(), 1);
    }

    #[tokio::test]
    async fn missing_key_is_a_miss() {
        let cache = MokaCache::default();
        assert_eq!(cache.get(&key("absent")).await, CacheLookup::Miss);
        assert_eq!(cache.misses(), 1);
    }

    #[tokio::test]
    async fn set_replaces_existing_value() {
        let cache = MokaCache::default();
        let ttl = Duration::from_secs(60);
        cache.set(&key("k"), "first".to_string(), ttl).await;
        cache.set(&key("k"), "second".to_string(), ttl).await;

        assert_eq!(
            cache.get(&key("k")).await,
            CacheLookup::Hit("second".to_string())
        );
    }

    #[tokio::test]
    async fn namespaces_are_separate_entries() {
        let cache = MokaCache::default();
        let prompt = Prompt::from("same");
        cache
            .set(
                &CacheKey::response(&prompt),
                "text".to_string(),
                Duration::from_secs(60),
            )
            .await;

        assert_eq!(
            cache.get(&CacheKey::stream(&prompt)).await,
            CacheLookup::Miss
        );
    }

    #[tokio::test]
    async fn entries_expire_after_their_ttl() {
        let cache = MokaCache::default();
        cache
            .set(&key("short"), "gone".to_string(), Duration::from_millis(50))
            .await;
        cache
            .set(&key("long"), "kept".to_string(), Duration::from_secs(60))
            .await;

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.get(&key("short")).await, CacheLookup::Miss);
        assert_eq!(
            cache.get(&key("long")).await,
            CacheLookup::Hit("kept".to_string())
        );
    }

    #[tokio::test]
    async fn ping_always_succeeds() {
        assert!(MokaCache::default().ping().await.is_stored());
    }
}
