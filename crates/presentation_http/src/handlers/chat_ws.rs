//! Streaming chat over WebSocket
//!
//! `GET /chat/ws?prompt=...` upgrades the connection and pushes each relay
//! fragment as a `{"token": ...}` text frame as soon as it is produced.
//!
//! Close codes:
//! - 1003 when the prompt is missing or empty (no data frames are sent)
//! - 1000 once the fragment sequence is exhausted
//! - 1011 after a `[stream error]` frame when the sequence fails or a send fails
//!
//! A client close or disconnect ends the loop and drops the fragment
//! stream, which cancels any upstream call in flight. A query string that
//! cannot be parsed counts as a missing prompt.

use std::sync::Arc;

use application::{CompletionRelay, FragmentStream};
use axum::{
    extract::{
        Query, State,
        rejection::QueryRejection,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    http::{HeaderMap, HeaderValue, header},
    response::Response,
};
use domain::Prompt;
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Marker sent as the last token when streaming fails
pub const STREAM_ERROR_TOKEN: &str = "[stream error]";

/// Query parameters of the streaming endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamParams {
    /// Prompt to stream a reply for
    #[serde(default)]
    pub prompt: Option<String>,
}

/// One data frame sent to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenFrame {
    /// Fragment text
    pub token: String,
}

/// How a streaming session ended
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    /// Every fragment was delivered
    Completed,
    /// The fragment sequence or a send failed
    Failed(String),
    /// The client closed or dropped the connection
    ClientGone,
}

/// Upgrade to a WebSocket and stream the reply for `prompt`
pub async fn chat_ws(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    params: Result<Query<StreamParams>, QueryRejection>,
    headers: HeaderMap,
) -> Response {
    let prompt = match params {
        Ok(Query(params)) => params.prompt.filter(|p| !p.is_empty()).map(Prompt::new),
        Err(rejection) => {
            debug!(error = %rejection, "Unparseable streaming query");
            None
        },
    };
    let relay = Arc::clone(&state.relay);

    let mut response = ws.on_upgrade(move |socket| stream_session(socket, relay, prompt));

    if let Some(origin) = headers.get(header::ORIGIN) {
        response
            .headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::clone(origin));
    }

    response
}

async fn stream_session(
    mut socket: WebSocket,
    relay: Arc<CompletionRelay>,
    prompt: Option<Prompt>,
) {
    let Some(prompt) = prompt else {
        warn!("Streaming request without prompt, closing");
        close(
            socket,
            close_code::UNSUPPORTED,
            "prompt query parameter is required",
        )
        .await;
        return;
    };

    info!(prompt_len = prompt.len(), "Streaming session started");
    let (end, sent) = forward_fragments(&mut socket, relay.stream(prompt)).await;

    match end {
        SessionEnd::Completed => {
            debug!(sent, "Streaming session completed");
            close(socket, close_code::NORMAL, "").await;
        },
        SessionEnd::Failed(reason) => {
            warn!(sent, reason = %reason, "Streaming session failed");
            // Best effort: the connection may already be broken
            let _ = send_token(&mut socket, STREAM_ERROR_TOKEN).await;
            close(socket, close_code::ERROR, "").await;
        },
        SessionEnd::ClientGone => {
            info!(sent, "Client went away, streaming cancelled");
        },
    }
}

/// Push fragments to the socket until the sequence ends, a send fails or the
/// client goes away. Returns how the session ended and the frames delivered.
///
/// The fragment stream is dropped on return, which cancels the upstream call
/// if it is still running.
async fn forward_fragments<S>(
    socket: &mut S,
    mut fragments: FragmentStream,
) -> (SessionEnd, usize)
where
    S: Sink<Message, Error = axum::Error> + Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let mut sent = 0_usize;

    let end = loop {
        tokio::select! {
            next = fragments.next() => match next {
                Some(Ok(fragment)) => {
                    if let Err(e) = send_token(socket, fragment.as_str()).await {
                        break SessionEnd::Failed(e);
                    }
                    sent += 1;
                },
                Some(Err(e)) => break SessionEnd::Failed(e.to_string()),
                None => break SessionEnd::Completed,
            },
            incoming = socket.next() => match incoming {
                Some(Ok(Message::Close(_)) | Err(_)) | None => break SessionEnd::ClientGone,
                Some(Ok(_)) => {}, // Client messages are ignored
            },
        }
    };

    (end, sent)
}

async fn send_token<S>(socket: &mut S, token: &str) -> Result<(), String>
where
    S: Sink<Message, Error = axum::Error> + Unpin,
{
    let frame = TokenFrame {
        token: token.to_string(),
    };
    let json = serde_json::to_string(&frame).map_err(|e| e.to_string())?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| e.to_string())
}

async fn close(mut socket: WebSocket, code: u16, reason: &'static str) {
    let frame = CloseFrame {
        code,
        reason: reason.into(),
    };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        debug!(error = %e, "Could not send close frame");
    }
}
