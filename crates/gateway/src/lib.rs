//! HTTP API gateway for Switchboard.
//!
//! Exposes the chat backend over Axum: `POST /api/chat` runs one chat
//! turn, `GET /api/chat/model` reports the model the current settings
//! resolve to, and `GET /health` answers liveness probes.
//!
//! The gateway also owns process wiring: it bootstraps the settings
//! store, builds the upstream client once from the startup connection
//! info, and serves until a shutdown signal arrives.

pub mod api;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    http::HeaderValue,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use switchboard_chat::ChatService;
use switchboard_config::AppConfig;
use switchboard_providers::OpenAiCompatClient;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub chat: ChatService,
    /// Root token for the process. Every request handler derives a child
    /// from it, so shutdown stops in-flight upstream calls too.
    pub shutdown: CancellationToken,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - Request body size limit (1 MB)
/// - CORS restricted to the configured browser origins
/// - HTTP trace logging
pub fn build_router(state: SharedState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/api/chat", post(api::chat_handler))
        .route("/api/chat/model", get(api::model_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(cors_layer(allowed_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for the configured origins. An origin that is not a valid
/// header value is logged and skipped rather than refusing startup.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring CORS origin that is not a valid header value");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
///
/// Bootstraps the settings store, wires the chat service, and serves
/// until SIGINT or SIGTERM. The store's refresh loop and every in-flight
/// request share the same cancellation tree, so one signal stops all of
/// them.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = CancellationToken::new();

    let source = switchboard_store::source_from_config(&config.store.source);
    let poll_interval = std::time::Duration::from_secs(config.store.poll_interval_secs);
    let store = switchboard_store::bootstrap(source, poll_interval, shutdown.child_token()).await?;

    let client = Arc::new(OpenAiCompatClient::from_connection(&store.connection));
    let chat = ChatService::new(store.snapshots, config.resolution.clone(), client);

    let state = Arc::new(GatewayState {
        chat,
        shutdown: shutdown.clone(),
    });

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let app = build_router(state, &config.gateway.allowed_origins);

    info!(addr = %addr, endpoint = %store.connection.endpoint, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown.cancel();
        })
        .await?;

    info!("Gateway stopped");
    Ok(())
}

/// Resolves when the process receives SIGINT or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
