//! Environment credential lookup.
//!
//! New chatbot configurations pick up their provider key from `GROQ_API_KEY`
//! when it is set. Keys are never read from anywhere else implicitly.

use chatforge_types::chatbot::ChatbotConfig;
use chatforge_types::config::GlobalConfig;

/// Environment variable holding the default provider key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Read a non-blank credential from `var`.
pub fn credential_from_env(var: &str) -> Option<String> {
    match std::env::var(var) {
        Ok(val) if !val.trim().is_empty() => Some(val),
        Ok(_) => None,
        Err(std::env::VarError::NotPresent) => None,
        Err(std::env::VarError::NotUnicode(_)) => {
            tracing::warn!("{var} is not valid unicode, ignoring it");
            None
        }
    }
}

/// Default provider key from [`API_KEY_ENV`].
pub fn default_api_key() -> Option<String> {
    credential_from_env(API_KEY_ENV)
}

/// A fresh chatbot configuration seeded from `global` defaults and `api_key`.
pub fn new_chatbot_config(global: &GlobalConfig, api_key: Option<String>) -> ChatbotConfig {
    ChatbotConfig {
        primary_color: global.defaults.primary_color.clone(),
        api_key: api_key.unwrap_or_default(),
        ..Default::default()
    }
}
