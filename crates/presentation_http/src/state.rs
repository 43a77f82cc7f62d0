//! Application state shared across handlers

use std::sync::Arc;

use application::CompletionRelay;
use infrastructure::AppConfig;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay serving both request modes
    pub relay: Arc<CompletionRelay>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Bundle the relay with its configuration
    pub fn new(relay: CompletionRelay, config: AppConfig) -> Self {
        Self {
            relay: Arc::new(relay),
            config: Arc::new(config),
        }
    }
}
