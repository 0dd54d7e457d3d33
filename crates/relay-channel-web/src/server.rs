//! HTTP server and routing.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::{
    extract::{ws::WebSocketUpgrade, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use rust_embed::RustEmbed;
use tower_http::trace::TraceLayer;

use crate::connection::handle_connection;
use crate::RelayState;

/// WebSocket endpoint path.
pub const WS_PATH: &str = "/ws/assistant";

/// Embedded browser UI.
#[derive(RustEmbed)]
#[folder = "src/static/"]
struct StaticAssets;

/// Create the Axum router for the relay.
pub fn create_router(state: Arc<RelayState>) -> Router {
    Router::new()
        // Static file routes
        .route("/", get(serve_index))
        .route("/style.css", get(serve_css))
        .route("/app.js", get(serve_js))
        // WebSocket endpoint
        .route(WS_PATH, get(ws_handler))
        // Health check
        .route("/health", get(health_check))
        // API info
        .route("/api/info", get(api_info))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn asset(name: &str, content_type: &'static str) -> Response {
    match StaticAssets::get(name) {
        Some(content) => (
            [(header::CONTENT_TYPE, content_type)],
            content.data.into_owned(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

async fn serve_index() -> Response {
    asset("index.html", "text/html; charset=utf-8")
}

async fn serve_css() -> Response {
    asset("style.css", "text/css")
}

async fn serve_js() -> Response {
    asset("app.js", "application/javascript")
}

/// WebSocket upgrade handler.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<RelayState>>) -> Response {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<RelayState>>) -> impl IntoResponse {
    let status = if state.started.load(Ordering::SeqCst) {
        "ok"
    } else {
        "starting"
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::json!({
            "status": status,
            "connections": state.connections.len(),
        })
        .to_string(),
    )
}

/// API info endpoint.
async fn api_info(State(state): State<Arc<RelayState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::json!({
            "name": "assistant-relay",
            "version": env!("CARGO_PKG_VERSION"),
            "model": state.handler.settings().model,
            "endpoints": {
                "websocket": WS_PATH,
                "health": "/health",
                "info": "/api/info"
            }
        })
        .to_string(),
    )
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
