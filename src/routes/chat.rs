//! Chat session REST routes.
//!
//! Sends are accepted synchronously and settled on a spawned task, so a
//! client that disconnects mid-request cannot abandon the in-flight call.
//! Callers watch `/api/chat/ws` or poll `/api/chat` for the outcome.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::message::Message;
use crate::session::{RejectReason, SessionSnapshot};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SendMessageBody {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
}

#[derive(Serialize)]
pub struct ChatConfigResponse {
    pub max_input_chars: usize,
    /// Prompts to offer while the transcript holds only the greeting.
    pub suggestions: Vec<String>,
}

/// `GET /api/chat` — current messages and busy flag.
pub async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot())
}

/// `GET /api/chat/messages` — current messages only.
pub async fn list_messages(State(state): State<AppState>) -> Json<Vec<Message>> {
    Json(state.session.snapshot().messages)
}

/// `POST /api/chat/messages` — start a send.
///
/// `202` when accepted, `200` with a reason when ignored (blank or busy).
pub async fn send_message(
    State(state): State<AppState>,
    Json(body): Json<SendMessageBody>,
) -> (StatusCode, Json<SendMessageResponse>) {
    match state.session.begin_send(&body.text) {
        Ok(pending) => {
            tokio::spawn(async move {
                pending.settle().await;
            });
            (StatusCode::ACCEPTED, Json(SendMessageResponse { accepted: true, reason: None }))
        }
        Err(reason) => {
            debug!(?reason, "chat route: send not accepted");
            (StatusCode::OK, Json(SendMessageResponse { accepted: false, reason: Some(reason) }))
        }
    }
}

/// `DELETE /api/chat/messages` — reset to the greeting.
pub async fn clear_messages(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.clear_messages())
}

/// `GET /api/chat/config` — presentation hints.
pub async fn get_config(State(state): State<AppState>) -> Json<ChatConfigResponse> {
    Json(ChatConfigResponse {
        max_input_chars: state.max_input_chars,
        suggestions: state.suggestions.to_vec(),
    })
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
