//! REST API request handlers.

pub mod catalog;
pub mod embed;
pub mod health;
pub mod session;

use chatforge_types::chatbot::{ChatbotConfig, mask_credential};

use crate::http::error::AppError;

/// Serialize a config for a response, masking the credential.
pub(crate) fn masked_config(config: &ChatbotConfig) -> Result<serde_json::Value, AppError> {
    let mut value =
        serde_json::to_value(config).map_err(|e| AppError::Internal(e.to_string()))?;
    value["apiKey"] = serde_json::Value::String(mask_credential(&config.api_key));
    Ok(value)
}
