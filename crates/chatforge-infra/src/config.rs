//! Global configuration loader for Chatforge.
//!
//! Reads `config.toml` from the data directory (`~/.chatforge/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::Path;

use chatforge_types::chatbot::{DEFAULT_PRIMARY_COLOR, is_valid_hex_color};
use chatforge_types::config::GlobalConfig;
use chatforge_types::llm::{DEFAULT_TEMPERATURE, TEMPERATURE_RANGE};

pub const CONFIG_FILE: &str = "config.toml";

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`GlobalConfig::default()`].
/// - Unreadable or unparsable file: a warning, then the default.
/// - An invalid `defaults.primary_color` is replaced by the default accent.
/// - A temperature outside [`TEMPERATURE_RANGE`] is replaced by [`DEFAULT_TEMPERATURE`].
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    let mut config = match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            return GlobalConfig::default();
        }
    };

    if !is_valid_hex_color(&config.defaults.primary_color) {
        tracing::warn!(
            color = %config.defaults.primary_color,
            "Invalid defaults.primary_color in {}, using {DEFAULT_PRIMARY_COLOR}",
            config_path.display()
        );
        config.defaults.primary_color = DEFAULT_PRIMARY_COLOR.to_string();
    }

    if !config.completion.settings.has_valid_temperature() {
        tracing::warn!(
            temperature = config.completion.settings.temperature,
            "completion.temperature in {} is outside {TEMPERATURE_RANGE:?}, using {DEFAULT_TEMPERATURE}",
            config_path.display()
        );
        config.completion.settings.temperature = DEFAULT_TEMPERATURE;
    }

    config
}
