//! Redis cache implementation
//!
//! Stores values as plain strings under their full cache key with a
//! server-side expiry. The connection is opened on first use and re-attempted
//! on later calls if it could not be established, so the service starts and
//! keeps serving while Redis is down.

use std::{future::Future, time::Duration};

use application::ports::{CacheLookup, CachePort, CacheWrite};
use async_trait::async_trait;
use domain::CacheKey;
use redis::{AsyncCommands, Client, RedisResult, aio::ConnectionManager};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, instrument, warn};

/// Errors raised while setting up the Redis adapter
#[derive(Debug, Error)]
pub enum RedisCacheError {
    /// The connection URL could not be parsed
    #[error("Invalid Redis URL: {0}")]
    InvalidUrl(String),
}

/// Redis-backed cache
pub struct RedisCache {
    client: Client,
    connection: OnceCell<ConnectionManager>,
    timeout: Duration,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("connected", &self.connection.initialized())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Create an adapter for the given URL without connecting.
    ///
    /// `timeout` bounds both the initial connection and every command.
    pub fn open(url: &str, timeout: Duration) -> Result<Self, RedisCacheError> {
        let client = Client::open(url).map_err(|e| RedisCacheError::InvalidUrl(e.to_string()))?;
        Ok(Self {
            client,
            connection: OnceCell::new(),
            timeout,
        })
    }

    /// Shared connection, established on first use
    async fn connection(&self) -> Result<ConnectionManager, String> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                debug!("Connecting to Redis");
                self.bounded(ConnectionManager::new(self.client.clone()))
                    .await
            })
            .await?;
        Ok(manager.clone())
    }

    /// Run a Redis future under the configured timeout
    async fn bounded<T>(
        &self,
        operation: impl Future<Output = RedisResult<T>>,
    ) -> Result<T, String> {
        match tokio::time::timeout(self.timeout, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("timed out after {}ms", self.timeout.as_millis())),
        }
    }
}

#[async_trait]
impl CachePort for RedisCache {
    #[instrument(skip(self, key), fields(namespace = %key.namespace()), level = "debug")]
    async fn get(&self, key: &CacheKey) -> CacheLookup {
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(reason) => return CacheLookup::Unavailable(reason),
        };

        match self.bounded(conn.get::<_, Option<String>>(key.as_str())).await {
            Ok(Some(value)) => {
                debug!("Cache hit");
                CacheLookup::Hit(value)
            },
            Ok(None) => {
                debug!("Cache miss");
                CacheLookup::Miss
            },
            Err(reason) => {
                warn!(reason = %reason, "Redis GET failed");
                CacheLookup::Unavailable(reason)
            },
        }
    }

    #[instrument(skip(self, key, value), fields(namespace = %key.namespace()), level = "debug")]
    async fn set(&self, key: &CacheKey, value: String, ttl: Duration) -> CacheWrite {
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(reason) => return CacheWrite::Unavailable(reason),
        };

        // SETEX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        match self
            .bounded(conn.set_ex::<_, _, ()>(key.as_str(), value, seconds))
            .await
        {
            Ok(()) => {
                debug!(ttl_secs = seconds, "Cache set");
                CacheWrite::Stored
            },
            Err(reason) => {
                warn!(reason = %reason, "Redis SETEX failed");
                CacheWrite::Unavailable(reason)
            },
        }
    }

    async fn ping(&self) -> CacheWrite {
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(reason) => return CacheWrite::Unavailable(reason),
        };

        match self
            .bounded(redis::cmd("PING").query_async::<String>(&mut conn))
            .await
        {
            Ok(_) => CacheWrite::Stored,
            Err(reason) => CacheWrite::Unavailable(reason),
        }
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
