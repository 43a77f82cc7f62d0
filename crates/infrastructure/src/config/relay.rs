//! Streaming pacing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delays applied between streamed fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaySettings {
    /// Pause after each fragment replayed from the cache
    #[serde(default = "default_replay_delay")]
    pub replay_delay_ms: u64,

    /// Pause after each placeholder fragment
    #[serde(default = "default_fallback_delay")]
    pub fallback_delay_ms: u64,
}

const fn default_replay_delay() -> u64 {
    20
}

const fn default_fallback_delay() -> u64 {
    50
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            replay_delay_ms: default_replay_delay(),
            fallback_delay_ms: default_fallback_delay(),
        }
    }
}

impl RelaySettings {
    /// Replay pause as a Duration
    pub const fn replay_delay(&self) -> Duration {
        Duration::from_millis(self.replay_delay_ms)
    }

    /// Placeholder pause as a Duration
    pub const fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }
}
