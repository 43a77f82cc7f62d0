//! Inference port - Interface to the completion service

use std::pin::Pin;

use async_trait::async_trait;
use domain::Prompt;
use futures::Stream;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Result of an inference call
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// Generated response content
    pub content: String,
    /// Model used for generation
    pub model: String,
    /// Number of tokens used (if available)
    pub tokens_used: Option<u32>,
    /// Latency in milliseconds
    pub latency_ms: u64,
}

/// Raw text deltas from the completion service, in production order.
///
/// Deltas may be empty; the relay filters them.
pub type InferenceStream = Pin<Box<dyn Stream<Item = Result<String, ApplicationError>> + Send>>;

/// Port for inference operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InferencePort: Send + Sync {
    /// Generate a complete response with the prompt as the sole message
    async fn generate(&self, prompt: &Prompt) -> Result<InferenceResult, ApplicationError>;

    /// Open an incremental response stream for the prompt
    async fn generate_stream(&self, prompt: &Prompt) -> Result<InferenceStream, ApplicationError>;
}
