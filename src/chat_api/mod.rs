//! Chat API — the external send operation behind the session.
//!
//! DESIGN
//! ======
//! The session only depends on the [`ChatSend`] trait. `ChatClient` is the
//! concrete implementation wired up in `main`: it posts to the configured
//! webhook, or fails every send when no webhook is configured so the
//! server can still start and render the conversation.

pub mod config;
pub mod types;
pub mod webhook;

use config::ChatApiConfig;
pub use types::{ChatApiError, ChatReply, ChatSend};

// =============================================================================
// CLIENT DISPATCH
// =============================================================================

/// Concrete sender chosen at startup.
pub struct ChatClient {
    inner: ChatBackend,
}

enum ChatBackend {
    Webhook(webhook::WebhookClient),
    Unconfigured,
}

impl ChatClient {
    /// Build a webhook-backed client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the webhook URL is missing or invalid, or the HTTP
    /// client fails to build.
    pub fn from_env() -> Result<Self, ChatApiError> {
        let config = ChatApiConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build a webhook-backed client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: ChatApiConfig) -> Result<Self, ChatApiError> {
        Ok(Self { inner: ChatBackend::Webhook(webhook::WebhookClient::new(config)?) })
    }

    /// A client that rejects every send with [`ChatApiError::NotConfigured`].
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { inner: ChatBackend::Unconfigured }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        matches!(self.inner, ChatBackend::Webhook(_))
    }
}

#[async_trait::async_trait]
impl ChatSend for ChatClient {
    async fn send(&self, text: &str) -> Result<ChatReply, ChatApiError> {
        match &self.inner {
            ChatBackend::Webhook(c) => c.send(text).await,
            ChatBackend::Unconfigured => Err(ChatApiError::NotConfigured),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::config::ChatTimeouts;

    #[tokio::test]
    async fn unconfigured_client_fails_every_send() {
        let client = ChatClient::unconfigured();
        assert!(!client.is_configured());
        let err = client.send("Hello").await.unwrap_err();
        assert!(matches!(err, ChatApiError::NotConfigured));
    }

    #[test]
    fn from_config_builds_webhook_backend() {
        let config = ChatApiConfig {
            webhook_url: "http://localhost:5678/webhook/chat".into(),
            timeouts: ChatTimeouts::default(),
        };
        let client = ChatClient::from_config(config).unwrap();
        assert!(client.is_configured());
    }
}
