//! Single-response chat handler

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use domain::Prompt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{error::ApiError, state::AppState};

/// Chat request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Prompt forwarded verbatim to the relay
    pub prompt: String,
}

/// Chat response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Full reply, or the placeholder text when the completion service failed
    pub response: String,
}

/// Handle a chat request
#[instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;
    let prompt = Prompt::new(request.prompt);
    debug!(prompt_len = prompt.len(), "Chat request received");

    let response = state.relay.generate(&prompt).await;

    Ok(Json(ChatResponse { response }))
}
