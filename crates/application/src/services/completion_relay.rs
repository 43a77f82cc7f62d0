//! Completion relay - cache-first completions with placeholder fallback
//!
//! Serves prompts in two modes. Single-response mode returns the whole
//! reply; streaming mode returns fragments as they are produced. Both modes
//! consult the cache first and populate it after a successful upstream call.
//! Upstream failures never reach the caller: a deterministic placeholder is
//! produced instead, and placeholders are never cached.

use std::{fmt, pin::Pin, sync::Arc, time::Duration};

use async_stream::stream;
use domain::{CacheKey, Fragment, Prompt, placeholder_fragments, placeholder_text};
use futures::{Stream, StreamExt};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{CacheLookup, CachePort, CacheWrite, InferencePort, ttl},
};

/// Lazy, finite sequence of fragments for one streaming request.
///
/// Dropping the stream cancels the upstream call. An `Err` item ends the
/// stream and marks a failure the relay could not recover from.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<Fragment, ApplicationError>> + Send>>;

/// Timing and expiry settings for the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayConfig {
    /// Expiry applied to both cache namespaces
    pub cache_ttl: Duration,
    /// Pause after each fragment replayed from the cache
    pub replay_delay: Duration,
    /// Pause after each placeholder fragment
    pub fallback_delay: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            cache_ttl: ttl::CHAT_RESPONSE,
            replay_delay: Duration::from_millis(20),
            fallback_delay: Duration::from_millis(50),
        }
    }
}

/// Service relaying prompts to the completion service through the cache
pub struct CompletionRelay {
    cache: Arc<dyn CachePort>,
    inference: Arc<dyn InferencePort>,
    config: RelayConfig,
}

impl fmt::Debug for CompletionRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionRelay")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CompletionRelay {
    /// Create a relay with default timing
    pub fn new(cache: Arc<dyn CachePort>, inference: Arc<dyn InferencePort>) -> Self {
        Self::with_config(cache, inference, RelayConfig::default())
    }

    /// Create a relay with explicit timing
    pub fn with_config(
        cache: Arc<dyn CachePort>,
        inference: Arc<dyn InferencePort>,
        config: RelayConfig,
    ) -> Self {
        Self {
            cache,
            inference,
            config,
        }
    }

    /// Active timing and expiry settings
    pub const fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Produce the full reply for a prompt.
    ///
    /// Never fails: an upstream error yields the placeholder text.
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn generate(&self, prompt: &Prompt) -> String {
        let key = CacheKey::response(prompt);

        if let Some(cached) = lookup(self.cache.as_ref(), &key).await {
            info!("Cache hit: returning cached response");
            return cached;
        }

        info!("Cache miss: calling completion service");
        match self.inference.generate(prompt).await {
            Ok(result) => {
                debug!(
                    model = %result.model,
                    tokens = ?result.tokens_used,
                    latency_ms = result.latency_ms,
                    "Completion received"
                );
                store(
                    self.cache.as_ref(),
                    &key,
                    result.content.clone(),
                    self.config.cache_ttl,
                )
                .await;
                result.content
            },
            Err(e) => {
                error!(error = %e, "Completion failed, returning placeholder");
                placeholder_text(prompt, &e.to_string())
            },
        }
    }

    /// Produce the reply for a prompt as a lazy fragment sequence.
    ///
    /// Each call re-reads the cache. A cached entry is replayed from the
    /// start with `replay_delay` pacing; otherwise fragments are forwarded in
    /// the order the upstream produces them and the full list is cached once
    /// the upstream completes. Upstream failures switch to the placeholder
    /// fragments, paced by `fallback_delay`.
    pub fn stream(&self, prompt: Prompt) -> FragmentStream {
        let cache = Arc::clone(&self.cache);
        let inference = Arc::clone(&self.inference);
        let config = self.config;

        Box::pin(stream! {
            let key = CacheKey::stream(&prompt);

            if let Some(cached) = lookup(cache.as_ref(), &key).await {
                let fragments: Vec<Fragment> = match serde_json::from_str(&cached) {
                    Ok(fragments) => fragments,
                    Err(e) => {
                        error!(error = %e, "Cached fragment list is unreadable");
                        yield Err(ApplicationError::from(e));
                        return;
                    },
                };

                info!(count = fragments.len(), "Cache hit: replaying cached fragments");
                for fragment in fragments {
                    yield Ok(fragment);
                    tokio::time::sleep(config.replay_delay).await;
                }
                return;
            }

            info!(prompt_len = prompt.len(), "Cache miss: streaming from completion service");
            let mut collected: Vec<Fragment> = Vec::new();
            let mut failure: Option<ApplicationError> = None;

            match inference.generate_stream(&prompt).await {
                Ok(mut upstream) => {
                    while let Some(item) = upstream.next().await {
                        match item {
                            Ok(text) => {
                                if let Some(fragment) = Fragment::new(text) {
                                    collected.push(fragment.clone());
                                    yield Ok(fragment);
                                }
                            },
                            Err(e) => {
                                failure = Some(e);
                                break;
                            },
                        }
                    }
                },
                Err(e) => failure = Some(e),
            }

            if let Some(e) = failure {
                error!(
                    error = %e,
                    emitted = collected.len(),
                    "Streaming failed, emitting placeholder"
                );
                let text = placeholder_text(&prompt, &e.to_string());
                for fragment in placeholder_fragments(&text) {
                    yield Ok(fragment);
                    tokio::time::sleep(config.fallback_delay).await;
                }
                return;
            }

            if collected.is_empty() {
                debug!("Upstream produced no fragments, nothing to cache");
                return;
            }

            match serde_json::to_string(&collected) {
                Ok(json) => {
                    debug!(count = collected.len(), "Caching streamed fragments");
                    store(cache.as_ref(), &key, json, config.cache_ttl).await;
                },
                Err(e) => warn!(error = %e, "Could not encode fragments for cache"),
            }
        })
    }
}

/// Read a cache entry, logging and absorbing unavailability
async fn lookup(cache: &dyn CachePort, key: &CacheKey) -> Option<String> {
    match cache.get(key).await {
        CacheLookup::Unavailable(reason) => {
            warn!(
                namespace = %key.namespace(),
                reason = %reason,
                "Cache lookup failed, continuing without cache"
            );
            None
        },
        outcome => outcome.into_value(),
    }
}

/// Write a cache entry, logging and absorbing unavailability
async fn store(cache: &dyn CachePort, key: &CacheKey, value: String, ttl: Duration) {
    if let CacheWrite::Unavailable(reason) = cache.set(key, value, ttl).await {
        warn!(
            namespace = %key.namespace(),
            reason = %reason,
            "Cache write failed, response not cached"
        );
    }
}
