//! Chat API types — reply shape, errors, and the send trait.

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by the external send operation.
///
/// Every variant is a transport-level failure from the session's point of
/// view. Logical failures reported by the assistant travel as
/// [`ChatReply::Failure`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ChatApiError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The webhook URL environment variable is not set.
    #[error("missing webhook URL: env var {var} not set")]
    MissingWebhookUrl { var: String },

    /// No webhook is configured; sends cannot leave the process.
    #[error("chat webhook not configured")]
    NotConfigured,

    /// The HTTP request did not complete (connect, timeout, body read).
    #[error("webhook request failed: {0}")]
    ApiRequest(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ChatApiError {
    /// Stable code for structured logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingWebhookUrl { .. } => "E_MISSING_WEBHOOK_URL",
            Self::NotConfigured => "E_NOT_CONFIGURED",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    /// Whether a later attempt could succeed. Informational only; the
    /// session never retries on its own.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_))
    }
}

// =============================================================================
// REPLY
// =============================================================================

/// Outcome of a send that reached the assistant and came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// The assistant answered. `message` may still be missing or empty.
    Success { message: Option<String> },
    /// The assistant (or its upstream) reported a logical failure.
    Failure { error: Option<String> },
}

#[cfg(test)]
impl ChatReply {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success { message: Some(message.into()) }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure { error: Some(error.into()) }
    }
}

// =============================================================================
// SEND TRAIT
// =============================================================================

/// Transport-neutral async send. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatSend: Send + Sync {
    /// Deliver one user message and wait for the assistant's reply.
    ///
    /// # Errors
    ///
    /// Returns a [`ChatApiError`] when the call itself does not complete.
    async fn send(&self, text: &str) -> Result<ChatReply, ChatApiError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
