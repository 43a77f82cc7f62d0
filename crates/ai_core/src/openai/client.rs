//! OpenAI chat-completions client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::streaming::create_stream;
use crate::{
    config::CompletionConfig,
    error::InferenceError,
    ports::{
        CompletionEngine, CompletionMessage, CompletionRequest, CompletionResponse,
        CompletionStream, TokenUsage,
    },
};

/// Completion engine backed by an OpenAI-compatible HTTP API
#[derive(Debug)]
pub struct OpenAiCompletionEngine {
    client: Client,
    config: CompletionConfig,
}

impl OpenAiCompletionEngine {
    /// Create a new engine
    pub fn new(config: CompletionConfig) -> Result<Self, InferenceError> {
        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder
            .build()
            .map_err(|e| InferenceError::ConnectionFailed(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            api_key_set = config.has_api_key(),
            "Initialized completion engine"
        );

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn resolve_model<'a>(&'a self, request: &'a CompletionRequest) -> &'a str {
        request.model.as_deref().unwrap_or(&self.config.model)
    }

    /// Send the request body and reject non-success statuses
    async fn send(&self, body: &ChatCompletionBody<'_>) -> Result<Response, InferenceError> {
        let api_key = self.config.api_key().ok_or(InferenceError::MissingApiKey)?;

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key.expose_secret())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&text)
            .map(|envelope| envelope.error.message)
            .unwrap_or(text);
        warn!(status = %status, message = %message, "Completion request failed");

        if status == StatusCode::TOO_MANY_REQUESTS {
            Err(InferenceError::RateLimited(message))
        } else {
            Err(InferenceError::ServerError(format!("Status {status}: {message}")))
        }
    }

    fn body<'a>(&'a self, request: &'a CompletionRequest, stream: bool) -> ChatCompletionBody<'a> {
        ChatCompletionBody {
            model: self.resolve_model(request),
            messages: &request.messages,
            stream,
            temperature: request.temperature.or(self.config.temperature),
            max_tokens: request.max_tokens.or(self.config.max_tokens),
        }
    }
}

/// Chat-completions request body
#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [CompletionMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Non-streaming chat-completions response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<ResponseChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ResponseChoice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error body returned with non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[async_trait]
impl CompletionEngine for OpenAiCompletionEngine {
    #[instrument(skip(self, request), fields(model = %self.resolve_model(&request)))]
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, InferenceError> {
        debug!("Sending completion request");

        let response = self.send(&self.body(&request, false)).await?;

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::InvalidResponse("No choices in response".to_string()))?;

        debug!(tokens = ?parsed.usage.as_ref().map(|u| u.total_tokens), "Completion received");

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            model: parsed.model,
            usage: parsed.usage,
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self, request), fields(model = %self.resolve_model(&request)))]
    async fn complete_stream(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionStream, InferenceError> {
        debug!("Opening completion stream");

        let response = self.send(&self.body(&request, true)).await?;

        Ok(create_stream(response))
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }
}
