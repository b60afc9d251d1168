//! Configuration export and import.
//!
//! The exported `chatbot-config.json` is the camelCase serialization of
//! [`ChatbotConfig`], pretty-printed with two-space indentation.

use chatforge_types::chatbot::ChatbotConfig;
use chatforge_types::error::ConfigError;

/// Download name for the exported configuration.
pub const CONFIG_FILE_NAME: &str = "chatbot-config.json";

/// Download name for the standalone widget page.
pub const HTML_FILE_NAME: &str = "chatbot.html";

/// Shown wherever a credential-bearing artifact is handed out.
pub const PLAINTEXT_CREDENTIAL_WARNING: &str = "The exported file contains your API key in plain text. \
Anyone who can read the page source can use it.";

/// Serialize `config` as pretty JSON.
pub fn export_config_json(config: &ChatbotConfig) -> Result<String, ConfigError> {
    serde_json::to_string_pretty(config).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Read a configuration previously written by [`export_config_json`].
///
/// Missing keys take their defaults.
pub fn import_config_json(text: &str) -> Result<ChatbotConfig, ConfigError> {
    serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
}
