//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the chat REST endpoints and the snapshot websocket under one Axum
//! router. When a static directory is configured, the browser client is
//! served from it as the fallback.

pub mod chat;
pub mod ws;

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/api/chat", get(chat::get_session))
        .route("/api/chat/messages", get(chat::list_messages).post(chat::send_message).delete(chat::clear_messages))
        .route("/api/chat/config", get(chat::get_config))
        .route("/api/chat/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => router,
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
