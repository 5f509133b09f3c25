//! Message store — the ordered chat transcript for one session.
//!
//! DESIGN
//! ======
//! `MessageStore` wraps a `Vec<Message>` and exposes three mutations:
//! append, replace-pending, and reset. Order is append order; nothing is
//! ever reordered. No I/O lives here. The only ambient input is the wall
//! clock used to stamp `created_at` when a message is constructed.
//!
//! INVARIANTS
//! ==========
//! - At most one pending message; it is assistant-authored with empty text.
//! - Ids are UUID v4 strings and never reused, including for removed
//!   placeholders and reseeded greetings.
//! - The store is never empty: it starts with the greeting and `reset`
//!   restores exactly one fresh greeting.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

pub const DEFAULT_GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";

/// Produce a fresh message id, unique for the lifetime of the process.
#[must_use]
pub fn generate_message_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// MESSAGE
// =============================================================================

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

/// A single chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    /// Message body. Empty only while `pending` is set.
    pub text: String,
    pub author: Author,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// `true` only for the placeholder awaiting a reply.
    pub pending: bool,
}

impl Message {
    fn new(author: Author, text: String, pending: bool) -> Self {
        Self { id: generate_message_id(), text, author, created_at: OffsetDateTime::now_utc(), pending }
    }

    /// A turn typed by the user.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Author::User, text.into(), false)
    }

    /// A settled assistant turn (reply, failure text, or apology).
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Author::Assistant, text.into(), false)
    }

    /// The "thinking" placeholder shown while a send is outstanding.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(Author::Assistant, String::new(), true)
    }

    /// The seeded greeting that opens every conversation.
    #[must_use]
    pub fn greeting(text: &str) -> Self {
        Self::assistant(text)
    }
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Debug, Clone)]
pub struct MessageStore {
    messages: Vec<Message>,
    greeting: String,
}

impl MessageStore {
    /// Create a store seeded with `greeting`.
    #[must_use]
    pub fn new(greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        Self { messages: vec![Message::greeting(&greeting)], greeting }
    }

    /// Push `message` to the end of the transcript.
    ///
    /// A duplicate id is a caller bug; it trips a debug assertion.
    pub fn append(&mut self, message: Message) {
        debug_assert!(
            self.messages.iter().all(|m| m.id != message.id),
            "duplicate message id {}",
            message.id
        );
        self.messages.push(message);
    }

    /// Drop every pending message, then append `resolution`.
    ///
    /// Returns how many placeholders were removed. Zero means this behaved
    /// as a plain append.
    pub fn replace_pending(&mut self, resolution: Message) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| !m.pending);
        let removed = before - self.messages.len();
        self.append(resolution);
        removed
    }

    /// Restore the transcript to a single, freshly stamped greeting.
    pub fn reset(&mut self) {
        self.messages = vec![Message::greeting(&self.greeting)];
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always `false` in practice; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.pending).count()
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}

#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
