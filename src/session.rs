//! Session controller — single-flight send cycle over the message store.
//!
//! DESIGN
//! ======
//! `ChatSession` owns the transcript and a two-state phase (`Idle` /
//! `Sending`). A send is split in two so callers can learn synchronously
//! whether it was accepted:
//!
//! 1. `begin_send` trims and validates input, flips the phase to `Sending`,
//!    and appends the user turn plus a pending placeholder, all under one
//!    lock. It returns a [`PendingSend`] handle.
//! 2. `PendingSend::settle` awaits the external sender (the only suspension
//!    point), then replaces the placeholder with exactly one assistant
//!    message and returns the phase to `Idle`.
//!
//! `send_message` runs both steps back to back.
//!
//! ERROR HANDLING
//! ==============
//! Nothing escapes to the caller. Structured failures and transport errors
//! both become assistant messages. A panic inside the sender counts as a
//! transport error. Dropping a `PendingSend` without settling it reconciles
//! it as a transport error too, so the phase can never stay stuck on
//! `Sending` once the handle is gone.
//!
//! CLEAR DURING SEND
//! =================
//! `clear_messages` resets the transcript but leaves the phase alone and
//! does not cancel the in-flight call. The late outcome is appended onto the
//! fresh greeting. Reconciliation logs a warning when it finds no
//! placeholder to replace.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::chat_api::{ChatReply, ChatSend};
use crate::message::{Message, MessageStore};

/// Shown when the assistant answered without usable text and gave no reason.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process your message. Please try again.";
/// Shown when the call to the assistant did not complete.
pub const CONNECTION_APOLOGY: &str = "Sorry, something went wrong. Please check your connection and try again.";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Sending,
}

/// Owned view of the session handed to render collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub busy: bool,
}

/// Why a send was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectReason {
    /// Input was empty after trimming.
    Empty,
    /// Another send is still outstanding.
    Busy,
}

/// Which reconciliation path a settled send took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The assistant replied with text.
    Reply,
    /// The assistant reported a failure, or replied with nothing.
    Failure,
    /// The call did not complete.
    Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Rejected(RejectReason),
    Completed(Resolution),
}

struct SessionState {
    store: MessageStore,
    phase: Phase,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot { messages: self.store.messages().to_vec(), busy: self.phase == Phase::Sending }
    }
}

// =============================================================================
// SESSION
// =============================================================================

pub struct ChatSession {
    state: Mutex<SessionState>,
    sender: Arc<dyn ChatSend>,
    changes: watch::Sender<SessionSnapshot>,
}

impl ChatSession {
    /// Create an idle session seeded with `greeting`.
    #[must_use]
    pub fn new(sender: Arc<dyn ChatSend>, greeting: impl Into<String>) -> Self {
        let state = SessionState { store: MessageStore::new(greeting), phase: Phase::Idle };
        let (changes, _) = watch::channel(state.snapshot());
        Self { state: Mutex::new(state), sender, changes }
    }

    /// Current messages and busy flag.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    /// Receive a fresh snapshot after every mutation. Rapid changes may
    /// coalesce; the latest value is always delivered.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.changes.subscribe()
    }

    /// Validate `raw_text` and, if accepted, append the user turn and the
    /// placeholder. The returned handle must be settled to finish the send.
    ///
    /// # Errors
    ///
    /// Returns the [`RejectReason`] when the input is blank or a send is
    /// already outstanding. Nothing is mutated in that case.
    pub fn begin_send(self: &Arc<Self>, raw_text: &str) -> Result<PendingSend, RejectReason> {
        let text = raw_text.trim();
        if text.is_empty() {
            debug!("chat: blank input ignored");
            return Err(RejectReason::Empty);
        }

        let mut state = self.lock();
        if state.phase == Phase::Sending {
            debug!(text_len = text.len(), "chat: send ignored while busy");
            return Err(RejectReason::Busy);
        }

        state.phase = Phase::Sending;
        let user = Message::user(text);
        info!(message_id = %user.id, text_len = text.len(), transcript_len = state.store.len(), "chat: send started");
        state.store.append(user);
        state.store.append(Message::placeholder());
        debug_assert_eq!(state.store.pending_count(), 1);
        self.publish(&state);
        drop(state);

        Ok(PendingSend { session: Arc::clone(self), text: text.to_string(), settled: false })
    }

    /// Run one full send cycle: validate, send, reconcile.
    pub async fn send_message(self: &Arc<Self>, raw_text: &str) -> SendOutcome {
        match self.begin_send(raw_text) {
            Ok(pending) => SendOutcome::Completed(pending.settle().await),
            Err(reason) => SendOutcome::Rejected(reason),
        }
    }

    /// Reset the transcript to the greeting. Does not touch the busy flag
    /// and does not cancel an outstanding send.
    pub fn clear_messages(&self) -> SessionSnapshot {
        let mut state = self.lock();
        if state.phase == Phase::Sending {
            warn!("chat: transcript cleared while a send is outstanding");
        }
        state.store.reset();
        debug_assert!(!state.store.is_empty());
        self.publish(&state);
        info!("chat: transcript cleared");
        state.snapshot()
    }

    fn reconcile(&self, message: Message, resolution: Resolution) {
        let mut state = self.lock();
        let message_id = message.id.clone();
        if state.store.replace_pending(message) == 0 {
            warn!(%message_id, "chat: no placeholder to replace; outcome appended to cleared transcript");
        }
        state.phase = Phase::Idle;
        self.publish(&state);
        info!(%message_id, ?resolution, "chat: send settled");
    }

    fn publish(&self, state: &SessionState) {
        self.changes.send_replace(state.snapshot());
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// PENDING SEND
// =============================================================================

/// An accepted send whose reply has not been reconciled yet.
///
/// Dropping it unsettled reconciles the send as a transport failure.
pub struct PendingSend {
    session: Arc<ChatSession>,
    text: String,
    settled: bool,
}

impl PendingSend {
    /// Await the external sender and reconcile its outcome.
    pub async fn settle(mut self) -> Resolution {
        let result = AssertUnwindSafe(self.session.sender.send(&self.text))
            .catch_unwind()
            .await;

        let (resolution, text) = match result {
            Ok(Ok(reply)) => resolve_reply(reply),
            Ok(Err(e)) => {
                warn!(error = %e, code = e.error_code(), retryable = e.retryable(), "chat: send failed");
                (Resolution::Transport, CONNECTION_APOLOGY.to_string())
            }
            Err(_) => {
                error!("chat: sender panicked");
                (Resolution::Transport, CONNECTION_APOLOGY.to_string())
            }
        };

        self.session.reconcile(Message::assistant(text), resolution);
        self.settled = true;
        resolution
    }
}

impl Drop for PendingSend {
    fn drop(&mut self) {
        if !self.settled {
            warn!("chat: send dropped before settling");
            self.session
                .reconcile(Message::assistant(CONNECTION_APOLOGY), Resolution::Transport);
        }
    }
}

/// Map a completed reply onto the message text that replaces the placeholder.
fn resolve_reply(reply: ChatReply) -> (Resolution, String) {
    match reply {
        ChatReply::Success { message: Some(text) } if !text.is_empty() => (Resolution::Reply, text),
        ChatReply::Success { .. } => (Resolution::Failure, FALLBACK_REPLY.to_string()),
        ChatReply::Failure { error } => {
            let text = error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| FALLBACK_REPLY.to_string());
            (Resolution::Failure, text)
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
