//! WebSocket handler — live session snapshots for the render layer.
//!
//! DESIGN
//! ======
//! On upgrade the handler subscribes to the session's change channel and
//! enters a `select!` loop:
//! - Session changed → serialize the latest snapshot and push it
//! - Incoming client command → `send` / `clear` against the session
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → push the current snapshot
//! 2. Every mutation → push the newest snapshot (rapid changes may coalesce)
//! 3. Close or send failure → drop the subscription

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::session::SessionSnapshot;
use crate::state::AppState;

// =============================================================================
// COMMANDS
// =============================================================================

/// Commands a client may send over the socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum WsCommand {
    Send { text: String },
    Clear,
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let mut changes = state.session.subscribe();

    let initial = changes.borrow_and_update().clone();
    if send_snapshot(&mut socket, &initial).await.is_err() {
        return;
    }

    info!(%client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => dispatch_command(&state, client_id, text.as_str()),
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = changes.borrow_and_update().clone();
                if send_snapshot(&mut socket, &snapshot).await.is_err() {
                    break;
                }
            }
        }
    }

    info!(%client_id, "ws: client disconnected");
}

fn dispatch_command(state: &AppState, client_id: Uuid, raw: &str) {
    let command = match serde_json::from_str::<WsCommand>(raw) {
        Ok(command) => command,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: unrecognized command");
            return;
        }
    };

    match command {
        WsCommand::Send { text } => match state.session.begin_send(&text) {
            Ok(pending) => {
                tokio::spawn(async move {
                    pending.settle().await;
                });
            }
            Err(reason) => debug!(%client_id, ?reason, "ws: send not accepted"),
        },
        WsCommand::Clear => {
            state.session.clear_messages();
        }
    }
}

async fn send_snapshot(socket: &mut WebSocket, snapshot: &SessionSnapshot) -> Result<(), ()> {
    let json = match serde_json::to_string(snapshot) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "ws: snapshot serialization failed");
            return Ok(());
        }
    };
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
