//! Cache port definition
//!
//! Defines the interface to the key/value store backing the completion
//! relay. Infrastructure failures are reported as explicit outcomes rather
//! than errors: a cache must never be the reason a request fails.

use std::time::Duration;

use async_trait::async_trait;
use domain::CacheKey;
#[cfg(test)]
use mockall::automock;

/// Outcome of a cache lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// A live entry exists
    Hit(String),
    /// No entry, or the entry expired
    Miss,
    /// The backing store could not be reached
    Unavailable(String),
}

impl CacheLookup {
    /// Collapse into the stored value, treating empty entries as absent
    pub fn into_value(self) -> Option<String> {
        match self {
            Self::Hit(value) if !value.is_empty() => Some(value),
            Self::Hit(_) | Self::Miss | Self::Unavailable(_) => None,
        }
    }

    /// Whether the store was reachable
    pub const fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable(_))
    }
}

/// Outcome of a cache write or liveness probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheWrite {
    /// The store accepted the operation
    Stored,
    /// The backing store could not be reached
    Unavailable(String),
}

impl CacheWrite {
    /// Whether the operation succeeded
    pub const fn is_stored(&self) -> bool {
        matches!(self, Self::Stored)
    }
}

/// Cache port for storing and retrieving cached values
///
/// Implementations map every infrastructure error to an `Unavailable`
/// outcome and never panic.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CachePort: Send + Sync {
    /// Look up a value by key
    async fn get(&self, key: &CacheKey) -> CacheLookup;

    /// Store a value with a time-to-live, replacing any existing entry
    async fn set(&self, key: &CacheKey, value: String, ttl: Duration) -> CacheWrite;

    /// Lightweight liveness probe against the backing store
    async fn ping(&self) -> CacheWrite;

    /// Short backend name used in logs
    fn backend(&self) -> &'static str;
}

/// Standard TTL values for cached completions
pub mod ttl {
    use std::time::Duration;

    /// TTL for both single responses and streamed fragment lists (1 hour)
    pub const CHAT_RESPONSE: Duration = Duration::from_secs(60 * 60);
}
