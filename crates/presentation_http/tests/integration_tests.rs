//! Integration tests for HTTP and WebSocket handlers
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use application::{
    ApplicationError, CachePort, CompletionRelay, InferencePort, InferenceResult, InferenceStream,
    RelayConfig,
};
use async_trait::async_trait;
use axum::{Router, http::StatusCode};
use axum_test::TestServer;
use domain::{CacheKey, Prompt};
use futures::{StreamExt, stream};
use infrastructure::{AppConfig, MokaCache};
use mockall::mock;
use presentation_http::{routes::create_router, state::AppState};
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::oneshot};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Message, client::IntoClientRequest},
};

mock! {
    Inference {}

    #[async_trait]
    impl InferencePort for Inference {
        async fn generate(&self, prompt: &Prompt) -> Result<InferenceResult, ApplicationError>;
        async fn generate_stream(&self, prompt: &Prompt) -> Result<InferenceStream, ApplicationError>;
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

fn result(content: &str) -> InferenceResult {
    InferenceResult {
        content: content.to_string(),
        model: "mock-model".to_string(),
        tokens_used: Some(3),
        latency_ms: 5,
    }
}

fn deltas(texts: &[&str]) -> InferenceStream {
    let items: Vec<Result<String, ApplicationError>> =
        texts.iter().map(|t| Ok((*t).to_string())).collect();
    Box::pin(stream::iter(items))
}

fn app_with_cache(inference: MockInference, cache: Arc<dyn CachePort>) -> Router {
    let relay = CompletionRelay::with_config(
        cache,
        Arc::new(inference),
        RelayConfig {
            replay_delay: Duration::ZERO,
            fallback_delay: Duration::ZERO,
            ..RelayConfig::default()
        },
    );
    create_router(AppState::new(relay, AppConfig::default()))
}

fn app(inference: MockInference) -> Router {
    app_with_cache(inference, Arc::new(MokaCache::default()))
}

fn test_server(inference: MockInference) -> TestServer {
    TestServer::new(app(inference)).expect("Failed to create test server")
}

async fn spawn_app(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Tokens received and the close code, read until the server closes
async fn read_session(url: String) -> (Vec<String>, Option<u16>) {
    let (mut ws, _) = connect_async(url).await.expect("WebSocket connect failed");
    let mut tokens = Vec::new();

    while let Some(message) = ws.next().await {
        match message.unwrap() {
            Message::Text(text) => {
                let frame: Value = serde_json::from_str(text.as_str()).unwrap();
                tokens.push(frame["token"].as_str().unwrap().to_string());
            },
            Message::Close(frame) => return (tokens, frame.map(|f| u16::from(f.code))),
            _ => {},
        }
    }

    (tokens, None)
}

// =============================================================================
// Health
// =============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn health_returns_ok() {
        let server = test_server(MockInference::new());

        let response = server.get("/").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}

// =============================================================================
// POST /chat
// =============================================================================

mod chat_tests {
    use super::*;

    #[tokio::test]
    async fn chat_returns_completion() {
        let mut inference = MockInference::new();
        inference
            .expect_generate()
            .withf(|prompt| prompt.as_str() == "hello")
            .returning(|_| Ok(result("hi there")));

        let response = test_server(inference)
            .post("/chat")
            .json(&json!({"prompt": "hello"}))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"response": "hi there"}));
    }

    #[tokio::test]
    async fn repeated_prompt_is_served_from_cache() {
        let mut inference = MockInference::new();
        inference
            .expect_generate()
            .times(1)
            .returning(|_| Ok(result("cached once")));

        let server = test_server(inference);
        for _ in 0..2 {
            server
                .post("/chat")
                .json(&json!({"prompt": "same"}))
                .await
                .assert_json(&json!({"response": "cached once"}));
        }
    }

    #[tokio::test]
    async fn upstream_failure_still_succeeds_with_placeholder() {
        let mut inference = MockInference::new();
        inference
            .expect_generate()
            .returning(|_| Err(ApplicationError::Inference("boom".to_string())));

        let response = test_server(inference)
            .post("/chat")
            .json(&json!({"prompt": "hello"}))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "response": "Demo response for: 'hello'. (API error: Inference error: boom)"
        }));
    }

    #[tokio::test]
    async fn missing_prompt_field_is_422() {
        let response = test_server(MockInference::new())
            .post("/chat")
            .json(&json!({"message": "wrong field"}))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn non_json_body_is_422() {
        let response = test_server(MockInference::new())
            .post("/chat")
            .text("prompt=hello")
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn handler_panic_becomes_500_with_detail() {
        let mut inference = MockInference::new();
        inference
            .expect_generate()
            .returning(|_| panic!("inference exploded"));

        let response = test_server(inference)
            .post("/chat")
            .json(&json!({"prompt": "hello"}))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({"detail": "inference exploded"}));
    }
}

// =============================================================================
// WebSocket /chat/ws
// =============================================================================

mod websocket_tests {
    use super::*;

    #[tokio::test]
    async fn missing_prompt_closes_with_1003_and_no_frames() {
        let mut inference = MockInference::new();
        inference.expect_generate_stream().never();
        let addr = spawn_app(app(inference)).await;

        let (tokens, code) = read_session(format!("ws://{addr}/chat/ws")).await;

        assert!(tokens.is_empty());
        assert_eq!(code, Some(1003));
    }

    #[tokio::test]
    async fn empty_prompt_closes_with_1003() {
        let addr = spawn_app(app(MockInference::new())).await;

        let (tokens, code) = read_session(format!("ws://{addr}/chat/ws?prompt=")).await;

        assert!(tokens.is_empty());
        assert_eq!(code, Some(1003));
    }

    #[tokio::test]
    async fn unparseable_query_closes_with_1003() {
        let mut inference = MockInference::new();
        inference.expect_generate_stream().never();
        let addr = spawn_app(app(inference)).await;

        let (tokens, code) =
            read_session(format!("ws://{addr}/chat/ws?prompt=a&prompt=b")).await;

        assert!(tokens.is_empty());
        assert_eq!(code, Some(1003));
    }

    #[tokio::test]
    async fn fragments_are_forwarded_then_closed_normally() {
        let mut inference = MockInference::new();
        inference
            .expect_generate_stream()
            .withf(|prompt| prompt.as_str() == "hello world")
            .returning(|_| Ok(deltas(&["Hel", "", "lo", "  ", " there"])));
        let addr = spawn_app(app(inference)).await;

        let (tokens, code) =
            read_session(format!("ws://{addr}/chat/ws?prompt=hello%20world")).await;

        assert_eq!(tokens, ["Hel", "lo", " there"]);
        assert_eq!(code, Some(1000));
    }

    #[tokio::test]
    async fn second_session_replays_from_cache() {
        let mut inference = MockInference::new();
        inference
            .expect_generate_stream()
            .times(1)
            .returning(|_| Ok(deltas(&["one", " two"])));
        let addr = spawn_app(app(inference)).await;
        let url = format!("ws://{addr}/chat/ws?prompt=count");

        let first = read_session(url.clone()).await;
        let second = read_session(url).await;

        assert_eq!(first.0, ["one", " two"]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn upstream_failure_streams_placeholder_and_closes_normally() {
        let mut inference = MockInference::new();
        inference
            .expect_generate_stream()
            .returning(|_| Err(ApplicationError::Inference("boom".to_string())));
        let addr = spawn_app(app(inference)).await;

        let (tokens, code) = read_session(format!("ws://{addr}/chat/ws?prompt=hi")).await;

        assert_eq!(
            tokens.concat(),
            "Demo response for: 'hi'. (API error: Inference error: boom) "
        );
        assert!(tokens.iter().all(|t| t.ends_with(' ')));
        assert_eq!(code, Some(1000));
    }

    #[tokio::test]
    async fn corrupt_cache_entry_sends_stream_error_and_1011() {
        let cache = Arc::new(MokaCache::default());
        cache
            .set(
                &CacheKey::stream(&Prompt::from("broken")),
                "not a fragment list".to_string(),
                Duration::from_secs(60),
            )
            .await;

        let mut inference = MockInference::new();
        inference.expect_generate_stream().never();
        let addr = spawn_app(app_with_cache(inference, cache)).await;

        let (tokens, code) = read_session(format!("ws://{addr}/chat/ws?prompt=broken")).await;

        assert_eq!(tokens, ["[stream error]"]);
        assert_eq!(code, Some(1011));
    }

    #[tokio::test]
    async fn client_close_cancels_upstream() {
        let (dropped_tx, dropped_rx) = oneshot::channel::<()>();

        let mut inference = MockInference::new();
        inference.expect_generate_stream().return_once(move |_| {
            let guard = DropSignal(Some(dropped_tx));
            let upstream = stream::iter(vec![Ok::<_, ApplicationError>("first".to_string())])
                .chain(stream::pending())
                .map(move |item| {
                    let _held = &guard;
                    item
                });
            Ok(Box::pin(upstream) as InferenceStream)
        });
        let addr = spawn_app(app(inference)).await;

        let (mut ws, _) = connect_async(format!("ws://{addr}/chat/ws?prompt=endless"))
            .await
            .unwrap();
        let first = ws.next().await.unwrap().unwrap();
        assert_eq!(first.into_text().unwrap().as_str(), r#"{"token":"first"}"#);

        ws.close(None).await.unwrap();

        tokio::time::timeout(Duration::from_secs(5), dropped_rx)
            .await
            .expect("upstream stream was not dropped")
            .unwrap();
    }

    #[tokio::test]
    async fn upgrade_echoes_origin() {
        let mut inference = MockInference::new();
        inference
            .expect_generate_stream()
            .returning(|_| Ok(deltas(&["ok"])));
        let addr = spawn_app(app(inference)).await;

        let mut request = format!("ws://{addr}/chat/ws?prompt=hi")
            .into_client_request()
            .unwrap();
        request
            .headers_mut()
            .insert("origin", "http://example.test".parse().unwrap());

        let (_ws, response) = connect_async(request).await.unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://example.test"
        );
    }

    /// Sends on drop, used to observe when the relay releases the upstream
    struct DropSignal(Option<oneshot::Sender<()>>);

    impl Drop for DropSignal {
        fn drop(&mut self) {
            if let Some(tx) = self.0.take() {
                let _ = tx.send(());
            }
        }
    }
}
