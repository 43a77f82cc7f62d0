//! Cache key value objects

use std::fmt;

use super::Prompt;

/// Namespace separating the two request modes in the cache.
///
/// An identical prompt produces distinct keys in each namespace, so a
/// single-response entry never satisfies a streaming lookup and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    /// Full response text from a single-response request
    Response,
    /// Ordered fragment list from a streaming request
    Stream,
}

impl CacheNamespace {
    /// Key prefix stored in the cache backend
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Response => "chat_response:",
            Self::Stream => "chat_stream:",
        }
    }
}

impl fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Response => write!(f, "response"),
            Self::Stream => write!(f, "stream"),
        }
    }
}

/// Deterministic cache key: namespace prefix followed by the raw prompt.
///
/// Keys are neither hashed nor normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: CacheNamespace,
    key: String,
}

impl CacheKey {
    /// Build the key for a prompt in the given namespace
    pub fn new(namespace: CacheNamespace, prompt: &Prompt) -> Self {
        let prefix = namespace.prefix();
        let mut key = String::with_capacity(prefix.len() + prompt.len());
        key.push_str(prefix);
        key.push_str(prompt.as_str());
        Self { namespace, key }
    }

    /// Key for the single-response namespace
    pub fn response(prompt: &Prompt) -> Self {
        Self::new(CacheNamespace::Response, prompt)
    }

    /// Key for the streamed-fragments namespace
    pub fn stream(prompt: &Prompt) -> Self {
        Self::new(CacheNamespace::Stream, prompt)
    }

    /// Namespace this key belongs to
    pub const fn namespace(&self) -> CacheNamespace {
        self.namespace
    }

    /// Full key as stored in the backend
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}
