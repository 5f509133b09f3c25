//! Server configuration parsed from environment variables.

use std::path::PathBuf;

use crate::message::DEFAULT_GREETING;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_INPUT_CHARS: usize = 2000;
/// Quick-action prompts offered while the transcript holds only the greeting.
pub const DEFAULT_SUGGESTIONS: [&str; 3] =
    ["What can you help me with?", "Tell me about yourself", "How does this work?"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Directory served at `/` for the browser client, if any.
    pub static_dir: Option<PathBuf>,
    pub greeting: String,
    /// Input length hint for the presentation layer's counter. Not enforced.
    pub max_input_chars: usize,
    pub suggestions: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: None,
            greeting: DEFAULT_GREETING.to_string(),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            suggestions: DEFAULT_SUGGESTIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl AppConfig {
    /// Build server config from environment variables.
    ///
    /// - `PORT`: default 3000
    /// - `STATIC_DIR`: unset by default
    /// - `CHAT_GREETING`: default greeting text
    /// - `CHAT_MAX_INPUT_CHARS`: default 2000
    /// - `CHAT_SUGGESTIONS`: `|`-separated prompts; set but blank disables them
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` or `CHAT_MAX_INPUT_CHARS` is set but not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port = env_parse("PORT", defaults.port)?;
        let max_input_chars = env_parse("CHAT_MAX_INPUT_CHARS", defaults.max_input_chars)?;
        let static_dir = non_blank_var("STATIC_DIR").map(PathBuf::from);
        let greeting = non_blank_var("CHAT_GREETING").unwrap_or(defaults.greeting);
        let suggestions = std::env::var("CHAT_SUGGESTIONS")
            .map(|raw| parse_suggestions(&raw))
            .unwrap_or(defaults.suggestions);
        Ok(Self { port, static_dir, greeting, max_input_chars, suggestions })
    }
}

fn env_parse<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

fn parse_suggestions(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn non_blank_var(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
