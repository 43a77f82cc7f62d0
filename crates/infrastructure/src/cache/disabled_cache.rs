//! Cache adapter that stores nothing

use std::time::Duration;

use application::ports::{CacheLookup, CachePort, CacheWrite};
use async_trait::async_trait;
use domain::CacheKey;

const REASON: &str = "caching disabled";

/// Cache used when no backend is configured or the backend cannot be set up.
///
/// Every lookup misses and every write reports the store as unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCache;

#[async_trait]
impl CachePort for DisabledCache {
    async fn get(&self, _key: &CacheKey) -> CacheLookup {
        CacheLookup::Miss
    }

    async fn set(&self, _key: &CacheKey, _value: String, _ttl: Duration) -> CacheWrite {
        CacheWrite::Unavailable(REASON.to_string())
    }

    async fn ping(&self) -> CacheWrite {
        CacheWrite::Unavailable(REASON.to_string())
    }

    fn backend(&self) -> &'static str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use domain::Prompt;

    use super::*;

    #[tokio::test]
    async fn never_stores() {
        let cache = DisabledCache;
        let key = CacheKey::response(&Prompt::from("hi"));

        let write = cache
            .set(&key, "value".to_string(), Duration::from_secs(60))
            .await;
        assert!(!write.is_stored());
        assert_eq!(cache.get(&key).await, CacheLookup::Miss);
    }
}
