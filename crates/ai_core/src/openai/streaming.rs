//! Server-sent event handling for streamed chat completions

use eventsource_stream::Eventsource;
use futures::{StreamExt, future};
use reqwest::Response;
use serde::Deserialize;
use tracing::trace;

use crate::{
    error::InferenceError,
    ports::{CompletionStream, StreamingChunk},
};

/// Data payload that terminates the event stream
const DONE_MARKER: &str = "[DONE]";

/// One `chat.completion.chunk` event
#[derive(Debug, Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<ChunkError>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkError {
    message: String,
}

/// Create a chunk stream from an SSE response
pub fn create_stream(response: Response) -> CompletionStream {
    let events = response.bytes_stream().eventsource();

    let chunk_stream = events
        .take_while(|event| {
            future::ready(!matches!(event, Ok(ev) if ev.data.trim() == DONE_MARKER))
        })
        .map(|event| match event {
            Ok(ev) => parse_chunk(&ev.data),
            Err(e) => Err(InferenceError::StreamError(e.to_string())),
        });

    Box::pin(chunk_stream)
}

/// Parse the JSON payload of one event
fn parse_chunk(data: &str) -> Result<StreamingChunk, InferenceError> {
    trace!(data = %data, "Parsing stream chunk");

    let chunk: CompletionChunk = serde_json::from_str(data)
        .map_err(|e| InferenceError::InvalidResponse(format!("JSON parse error: {e}")))?;

    if let Some(error) = chunk.error {
        return Err(InferenceError::StreamError(error.message));
    }

    let (content, finish_reason) = chunk
        .choices
        .into_iter()
        .next()
        .map(|choice| (choice.delta.content.unwrap_or_default(), choice.finish_reason))
        .unwrap_or_default();

    Ok(StreamingChunk {
        content,
        finish_reason,
    })
}
