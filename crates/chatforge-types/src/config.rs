//! Global configuration types for Chatforge.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls where
//! preview completions are sent and the defaults for new chatbot configs.

use serde::{Deserialize, Serialize};

use crate::chatbot::DEFAULT_PRIMARY_COLOR;
use crate::llm::CompletionSettings;

/// Top-level configuration for Chatforge.
///
/// Loaded from `~/.chatforge/config.toml`. All fields have defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub completion: CompletionConfig,

    #[serde(default)]
    pub defaults: ChatbotDefaults,

    #[serde(default)]
    pub server: ServerConfig,
}

/// `[completion]` table: the provider call plus its transport timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(flatten)]
    pub settings: CompletionSettings,

    /// Seconds before an outstanding completion call is abandoned.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            settings: CompletionSettings::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// `[defaults]` table: seed values for freshly created chatbot configs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotDefaults {
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
}

fn default_primary_color() -> String {
    DEFAULT_PRIMARY_COLOR.to_string()
}

impl Default for ChatbotDefaults {
    fn default() -> Self {
        Self {
            primary_color: default_primary_color(),
        }
    }
}

/// `[server]` table: lifetime of REST preview sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Seconds a session may sit unused before it is closed. 0 keeps sessions forever.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,

    /// Seconds between idle-session sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_session_idle_secs() -> u64 {
    30 * 60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            session_idle_secs: default_session_idle_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{DEFAULT_ENDPOINT, DEFAULT_MODEL};

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.completion.settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.completion.settings.model, DEFAULT_MODEL);
        assert_eq!(config.completion.request_timeout_secs, 30);
        assert_eq!(config.defaults.primary_color, "#007bff");
    }

    #[test]
    fn test_global_config_deserialize_empty() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.completion.settings.max_tokens, 100);
        assert_eq!(config.defaults.primary_color, DEFAULT_PRIMARY_COLOR);
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r##"
[completion]
endpoint = "http://localhost:8080/v1/chat/completions"
model = "llama-3.3-70b-versatile"
max_tokens = 256
request_timeout_secs = 5

[defaults]
primary_color = "#22aa55"
"##;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.completion.settings.endpoint,
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(config.completion.settings.model, "llama-3.3-70b-versatile");
        assert_eq!(config.completion.settings.max_tokens, 256);
        // Unset keys keep their defaults
        assert!((config.completion.settings.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.completion.request_timeout_secs, 5);
        assert_eq!(config.defaults.primary_color, "#22aa55");
    }

    #[test]
    fn test_server_config_defaults_and_override() {
        let config = GlobalConfig::default();
        assert_eq!(config.server.session_idle_secs, 1800);
        assert_eq!(config.server.sweep_interval_secs, 60);

        let config: GlobalConfig = toml::from_str("[server]\nsession_idle_secs = 0\n").unwrap();
        assert_eq!(config.server.session_idle_secs, 0);
        assert_eq!(config.server.sweep_interval_secs, 60);
    }
}
