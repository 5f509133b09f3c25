use super::*;
use crate::state::test_helpers::env_guard;

/// # Safety
/// Callers hold `env_guard()` so no other test touches the env.
unsafe fn clear_app_env() {
    unsafe {
        std::env::remove_var("PORT");
        std::env::remove_var("STATIC_DIR");
        std::env::remove_var("CHAT_GREETING");
        std::env::remove_var("CHAT_MAX_INPUT_CHARS");
        std::env::remove_var("CHAT_SUGGESTIONS");
    }
}

#[test]
fn from_env_defaults() {
    let _guard = env_guard();
    unsafe { clear_app_env() };

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(cfg.port, 3000);
    assert_eq!(cfg.max_input_chars, 2000);
    assert_eq!(cfg.greeting, DEFAULT_GREETING);
    assert!(cfg.static_dir.is_none());
    assert_eq!(cfg.suggestions, DEFAULT_SUGGESTIONS);
}

#[test]
fn from_env_parses_overrides() {
    let _guard = env_guard();
    unsafe {
        clear_app_env();
        std::env::set_var("PORT", "8080");
        std::env::set_var("STATIC_DIR", "/srv/chat");
        std::env::set_var("CHAT_GREETING", "Welcome back!");
        std::env::set_var("CHAT_MAX_INPUT_CHARS", "500");
        std::env::set_var("CHAT_SUGGESTIONS", " Summarize my week | | What's new? ");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.static_dir, Some(PathBuf::from("/srv/chat")));
    assert_eq!(cfg.greeting, "Welcome back!");
    assert_eq!(cfg.max_input_chars, 500);
    assert_eq!(cfg.suggestions, vec!["Summarize my week", "What's new?"]);

    unsafe { clear_app_env() };
}

#[test]
fn from_env_blank_greeting_uses_default() {
    let _guard = env_guard();
    unsafe {
        clear_app_env();
        std::env::set_var("CHAT_GREETING", "   ");
    }

    assert_eq!(AppConfig::from_env().unwrap().greeting, DEFAULT_GREETING);

    unsafe { clear_app_env() };
}

#[test]
fn from_env_invalid_port_errors() {
    let _guard = env_guard();
    unsafe {
        clear_app_env();
        std::env::set_var("PORT", "eighty");
    }

    let err = AppConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("invalid PORT"));
    assert!(err.contains("eighty"));

    unsafe { clear_app_env() };
}

#[test]
fn from_env_blank_suggestions_disables_them() {
    let _guard = env_guard();
    unsafe {
        clear_app_env();
        std::env::set_var("CHAT_SUGGESTIONS", "  ");
    }

    assert!(AppConfig::from_env().unwrap().suggestions.is_empty());

    unsafe { clear_app_env() };
}
