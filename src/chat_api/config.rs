//! Webhook configuration parsed from environment variables.

use super::types::ChatApiError;

pub const WEBHOOK_URL_VAR: &str = "CHAT_WEBHOOK_URL";
pub const DEFAULT_CHAT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CHAT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for ChatTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_CHAT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CHAT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatApiConfig {
    pub webhook_url: String,
    pub timeouts: ChatTimeouts,
}

impl ChatApiConfig {
    /// Build typed webhook config from environment variables.
    ///
    /// Required:
    /// - `CHAT_WEBHOOK_URL`: `http://` or `https://` endpoint
    ///
    /// Optional:
    /// - `CHAT_REQUEST_TIMEOUT_SECS`: default 60
    /// - `CHAT_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unset or not an http(s) URL.
    pub fn from_env() -> Result<Self, ChatApiError> {
        let raw = std::env::var(WEBHOOK_URL_VAR).map_err(|_| ChatApiError::MissingWebhookUrl { var: WEBHOOK_URL_VAR.into() })?;
        let webhook_url = parse_webhook_url(&raw)?;
        let timeouts = ChatTimeouts {
            request_secs: env_parse_u64("CHAT_REQUEST_TIMEOUT_SECS", DEFAULT_CHAT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("CHAT_CONNECT_TIMEOUT_SECS", DEFAULT_CHAT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { webhook_url, timeouts })
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_webhook_url(raw: &str) -> Result<String, ChatApiError> {
    let url = raw.trim().trim_end_matches('/');
    if url.is_empty() {
        return Err(ChatApiError::MissingWebhookUrl { var: WEBHOOK_URL_VAR.into() });
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ChatApiError::ConfigParse(format!("{WEBHOOK_URL_VAR} must be an http(s) URL, got '{url}'")));
    }
    Ok(url.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
