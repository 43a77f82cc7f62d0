//! OpenAI inference adapter - Implements InferencePort using ai_core
//!
//! Sends the prompt as the sole user message to an OpenAI-compatible
//! chat-completions API.

use std::time::Instant;

use ai_core::{
    CompletionConfig, CompletionEngine, CompletionRequest, InferenceError, OpenAiCompletionEngine,
};
use application::{
    error::ApplicationError,
    ports::{InferencePort, InferenceResult, InferenceStream},
};
use async_trait::async_trait;
use domain::Prompt;
use futures::StreamExt;
use tracing::{debug, instrument};

/// Adapter for OpenAI-compatible completion services
#[derive(Debug)]
pub struct OpenAiInferenceAdapter {
    engine: OpenAiCompletionEngine,
}

impl OpenAiInferenceAdapter {
    /// Create a new adapter with the given configuration
    pub fn new(config: CompletionConfig) -> Result<Self, ApplicationError> {
        let engine = OpenAiCompletionEngine::new(config)
            .map_err(|e| ApplicationError::Inference(e.to_string()))?;
        Ok(Self { engine })
    }

    /// Model requested for every completion
    pub fn model(&self) -> &str {
        self.engine.default_model()
    }

    /// Convert ai_core error to application error
    fn map_error(e: InferenceError) -> ApplicationError {
        match e {
            InferenceError::RateLimited(msg) => {
                ApplicationError::ExternalService(format!("Rate limited: {msg}"))
            },
            InferenceError::ConnectionFailed(msg) => {
                ApplicationError::ExternalService(format!("Connection failed: {msg}"))
            },
            InferenceError::Timeout => {
                ApplicationError::ExternalService("Completion request timed out".to_string())
            },
            other => ApplicationError::Inference(other.to_string()),
        }
    }
}

#[async_trait]
impl InferencePort for OpenAiInferenceAdapter {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &Prompt) -> Result<InferenceResult, ApplicationError> {
        let start = Instant::now();

        let response = self
            .engine
            .complete(CompletionRequest::user(prompt.as_str()))
            .await
            .map_err(Self::map_error)?;

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        debug!(
            model = %response.model,
            tokens = ?response.usage.as_ref().map(|u| u.total_tokens),
            latency_ms = latency_ms,
            "Completion finished"
        );

        Ok(InferenceResult {
            content: response.content,
            model: response.model,
            tokens_used: response.usage.map(|u| u.total_tokens),
            latency_ms,
        })
    }

    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate_stream(&self, prompt: &Prompt) -> Result<InferenceStream, ApplicationError> {
        let stream = self
            .engine
            .complete_stream(CompletionRequest::user(prompt.as_str()).streaming())
            .await
            .map_err(Self::map_error)?;

        debug!("Completion stream opened");

        Ok(Box::pin(stream.map(|chunk| {
            chunk
                .map(|chunk| chunk.content)
                .map_err(Self::map_error)
        })))
    }
}
