//! Webhook client — one JSON POST per user message.
//!
//! Thin HTTP wrapper around the assistant workflow endpoint. Pure parsing
//! in `parse_response` for testability.
//!
//! WIRE FORMAT
//! ===========
//! Request: `{ "message": "<text>", "timestamp": "<rfc3339>" }`.
//!
//! Response (first match wins):
//! - non-2xx: logical failure, using the body's `error` string if present
//! - JSON array: the first element is read as below
//! - JSON object: `success: false` or an `error` string is a failure;
//!   otherwise the reply is the first non-blank of `output`, `message`,
//!   `response`, `text`, kept verbatim
//! - JSON string: the string is the reply, kept verbatim
//! - plain-text body: the body with surrounding whitespace stripped
//!
//! Blank strings count as absent. Reply text is never trimmed.

use std::time::Duration;

use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing::debug;

use super::config::ChatApiConfig;
use super::types::{ChatApiError, ChatReply, ChatSend};

const REPLY_FIELDS: [&str; 4] = ["output", "message", "response", "text"];

// =============================================================================
// CLIENT
// =============================================================================

pub struct WebhookClient {
    http: reqwest::Client,
    url: String,
}

impl WebhookClient {
    /// Build a client for the configured webhook.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: ChatApiConfig) -> Result<Self, ChatApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ChatApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: config.webhook_url })
    }
}

#[async_trait::async_trait]
impl ChatSend for WebhookClient {
    async fn send(&self, text: &str) -> Result<ChatReply, ChatApiError> {
        let body = WebhookRequest { message: text, timestamp: OffsetDateTime::now_utc() };

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatApiError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ChatApiError::ApiRequest(e.to_string()))?;

        debug!(status, body_len = text.len(), "webhook: response received");
        Ok(parse_response(status, &text))
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct WebhookRequest<'a> {
    message: &'a str,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(status: u16, body: &str) -> ChatReply {
    let ok = (200..300).contains(&status);
    let trimmed = body.trim();

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return if ok { ChatReply::Success { message: non_empty(trimmed) } } else { ChatReply::Failure { error: None } };
    };

    // Workflow engines commonly wrap the item in a one-element array.
    let value = match value {
        Value::Array(items) => items.into_iter().next().unwrap_or(Value::Null),
        other => other,
    };

    if !ok {
        let error = value
            .get("error")
            .and_then(Value::as_str)
            .and_then(non_empty);
        return ChatReply::Failure { error };
    }

    match value {
        Value::Object(map) => reply_from_object(&map),
        Value::String(text) => ChatReply::Success { message: non_empty(&text) },
        _ => ChatReply::Success { message: None },
    }
}

fn reply_from_object(map: &Map<String, Value>) -> ChatReply {
    let success = map.get("success").and_then(Value::as_bool);
    let error = map
        .get("error")
        .and_then(Value::as_str)
        .and_then(non_empty);

    if success == Some(false) || (error.is_some() && success != Some(true)) {
        return ChatReply::Failure { error };
    }

    let message = REPLY_FIELDS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str).and_then(non_empty));
    ChatReply::Success { message }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.trim().is_empty()).then(|| s.to_string())
}

#[cfg(test)]
#[path = "webhook_test.rs"]
mod tests;
