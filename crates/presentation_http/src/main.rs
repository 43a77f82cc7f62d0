//! Chat relay HTTP server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use application::CompletionRelay;
use infrastructure::{AppConfig, OpenAiInferenceAdapter, build_cache, init_logging, probe_cache};
use presentation_http::{routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    let config = AppConfig::load();
    let log_format = config
        .as_ref()
        .map(|c| c.server.log_format)
        .unwrap_or_default();
    init_logging(log_format)?;

    info!("Chat relay v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    let config = config.unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    info!(
        host = %config.server.host,
        port = %config.server.port,
        model = %config.completion.model,
        cache = ?config.cache.backend,
        "Configuration loaded"
    );

    if !config.completion.has_api_key() {
        warn!("OPENAI_API_KEY is not set; completions will fall back to placeholder responses");
    }

    // Cache: unreachable stores are logged, never fatal
    let cache = build_cache(&config.cache);
    probe_cache(cache.as_ref()).await;

    let inference = OpenAiInferenceAdapter::new(config.completion.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize completion client: {e}"))?;

    let relay = CompletionRelay::with_config(cache, Arc::new(inference), config.relay_config());

    let addr = config.server.bind_address();
    let shutdown_timeout = config.server.shutdown_timeout();
    let app = routes::create_router(AppState::new(relay, config));

    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        warn!("Graceful shutdown timed out, exiting");
        std::process::exit(1);
    });
}
