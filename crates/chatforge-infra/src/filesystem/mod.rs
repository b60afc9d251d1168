//! Filesystem adapters for Chatforge.
//!
//! Chatbot configurations live in standalone JSON files chosen by the user
//! (`-c FILE`); exported widgets and pages are written wherever `-o` points.

use std::path::{Path, PathBuf};

use thiserror::Error;

use chatforge_core::embed::{export_config_json, import_config_json};
use chatforge_types::chatbot::ChatbotConfig;
use chatforge_types::error::ConfigError;

/// Errors from reading or writing Chatforge files.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CHATFORGE_DATA_DIR` environment variable
/// 2. `~/.chatforge`
/// 3. `./.chatforge` when no home directory is known
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHATFORGE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatforge");
    }

    PathBuf::from(".chatforge")
}

/// Write `content` to `path`, creating parent directories as needed.
pub async fn write_file(path: &Path, content: &str) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StorageError::io(parent, e))?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|e| StorageError::io(path, e))
}

/// Load a chatbot configuration JSON file.
pub async fn load_chatbot_config(path: &Path) -> Result<ChatbotConfig, StorageError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StorageError::io(path, e))?;
    import_config_json(&content).map_err(|source| StorageError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Save a chatbot configuration in the exported JSON format.
pub async fn save_chatbot_config(path: &Path, config: &ChatbotConfig) -> Result<(), StorageError> {
    let json = export_config_json(config).map_err(|source| StorageError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    write_file(path, &format!("{json}\n")).await?;
    tracing::debug!("Saved chatbot config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatforge_types::chatbot::Tone;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("nested").join("deep").join("chatbot.html");

        write_file(&file_path, "<!DOCTYPE html>").await.unwrap();
        let content = tokio::fs::read_to_string(&file_path).await.unwrap();
        assert_eq!(content, "<!DOCTYPE html>");
    }

    #[tokio::test]
    async fn test_save_and_load_chatbot_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chatbot-config.json");
        let config = ChatbotConfig {
            company_name: "Acme".to_string(),
            tone: Tone::Professional,
            ..Default::default()
        };

        save_chatbot_config(&path, &config).await.unwrap();
        let loaded = load_chatbot_config(&path).await.unwrap();
        assert_eq!(loaded, config);

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(raw.contains("\"companyName\": \"Acme\""));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_chatbot_config(&dir.path().join("missing.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_invalid_json_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let err = load_chatbot_config(&path).await.unwrap_err();
        assert!(matches!(err, StorageError::Config { .. }));
    }
}
