//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the one chat session this process serves, plus the hints
//! handed to the presentation layer (input length, quick-action prompts).

use std::sync::Arc;

use crate::session::ChatSession;

/// Shared application state. Clone is required by Axum; the session is
/// Arc-wrapped so every handler sees the same transcript.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ChatSession>,
    pub max_input_chars: usize,
    pub suggestions: Arc<[String]>,
}

impl AppState {
    #[must_use]
    pub fn new(session: Arc<ChatSession>, max_input_chars: usize, suggestions: Vec<String>) -> Self {
        Self { session, max_input_chars, suggestions: suggestions.into() }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_session() {
        let state = test_helpers::test_app_state();
        let clone = state.clone();
        assert!(Arc::ptr_eq(&state.session, &clone.session));
        clone.session.clear_messages();
        assert_eq!(state.session.snapshot().messages.len(), 1);
    }

    #[test]
    fn test_state_uses_default_hint() {
        let state = test_helpers::test_app_state();
        assert_eq!(state.max_input_chars, 2000);
        assert_eq!(state.suggestions.len(), 3);
        assert!(!state.session.snapshot().busy);
    }
}
