//! Embed and export handlers.
//!
//! All three take a chatbot config in the body and render it directly, so
//! they work without a preview session.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatforge_core::chat::prompt::{build_embed_directive, build_welcome_message};
use chatforge_core::embed::{
    CONFIG_FILE_NAME, HTML_FILE_NAME, PLAINTEXT_CREDENTIAL_WARNING, export_config_json,
    generate_embed_for, wrap_as_standalone_html,
};
use chatforge_types::chatbot::ChatbotConfig;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Response header carrying the plaintext-credential notice on exports.
pub const WARNING_HEADER: &str = "x-chatforge-warning";

fn attachment(
    config: &ChatbotConfig,
    content_type: &'static str,
    file_name: &str,
    body: String,
) -> Response {
    let disposition = format!("attachment; filename=\"{file_name}\"");
    let mut response = (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response();
    if config.has_credential() {
        response.headers_mut().insert(
            WARNING_HEADER,
            header::HeaderValue::from_static(PLAINTEXT_CREDENTIAL_WARNING),
        );
    }
    response
}

/// POST /api/v1/embed - Widget snippet for a config.
pub async fn embed(
    State(state): State<AppState>,
    Json(config): Json<ChatbotConfig>,
) -> Json<ApiResponse<serde_json::Value>> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let snippet = generate_embed_for(&state.global_config.completion.settings, &config);
    let data = json!({
        "welcomeMessage": build_welcome_message(&config),
        "systemPrompt": build_embed_directive(&config),
        "snippet": snippet,
    });

    let elapsed = start.elapsed().as_millis() as u64;
    let mut resp = ApiResponse::success(data, request_id, elapsed)
        .with_link("html", "/api/v1/export/html")
        .with_link("config", "/api/v1/export/config");
    if config.has_credential() {
        resp = resp.with_warning(PLAINTEXT_CREDENTIAL_WARNING);
    }
    Json(resp)
}

/// POST /api/v1/export/config - Download `chatbot-config.json`.
pub async fn export_config(Json(config): Json<ChatbotConfig>) -> Result<Response, AppError> {
    let body = format!("{}\n", export_config_json(&config)?);
    Ok(attachment(&config, "application/json", CONFIG_FILE_NAME, body))
}

/// POST /api/v1/export/html - Download `chatbot.html`.
pub async fn export_html(
    State(state): State<AppState>,
    Json(config): Json<ChatbotConfig>,
) -> Response {
    let snippet = generate_embed_for(&state.global_config.completion.settings, &config);
    let page = wrap_as_standalone_html(&snippet);
    attachment(&config, "text/html; charset=utf-8", HTML_FILE_NAME, page)
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use chatforge_core::embed::import_config_json;

    use super::*;
    use crate::http::handlers::test_support::{acme_config, echo_state};

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_embed_returns_snippet_and_warning() {
        let Json(resp) = embed(State(echo_state()), Json(acme_config())).await;
        let data = resp.data.unwrap();
        let snippet = data["snippet"].as_str().unwrap();
        assert!(snippet.contains("gsk_test_secret_1234"));
        assert_eq!(
            data["systemPrompt"],
            "You are a support chatbot named \"Max\" for Acme. Tone: friendly. \
             Keep responses short (1-2 sentences). Use friendly emojis."
        );
        assert_eq!(resp.warnings, vec![PLAINTEXT_CREDENTIAL_WARNING.to_string()]);
    }

    #[tokio::test]
    async fn test_embed_without_credential_has_no_warning() {
        let config = ChatbotConfig {
            api_key: String::new(),
            ..acme_config()
        };
        let Json(resp) = embed(State(echo_state()), Json(config)).await;
        assert!(resp.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_export_config_is_importable_attachment() {
        let config = acme_config();
        let response = export_config(Json(config.clone())).await.unwrap();

        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"chatbot-config.json\""
        );
        assert!(headers.contains_key(WARNING_HEADER));

        let body = body_text(response).await;
        assert_eq!(import_config_json(&body).unwrap(), config);
    }

    #[tokio::test]
    async fn test_export_html_is_standalone_page() {
        let config = ChatbotConfig {
            api_key: String::new(),
            ..acme_config()
        };
        let response = export_html(State(echo_state()), Json(config)).await;

        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"chatbot.html\""
        );
        assert!(!response.headers().contains_key(WARNING_HEADER));

        let body = body_text(response).await;
        assert!(body.starts_with("<!DOCTYPE html>"));
        assert!(body.contains("Chatbot Preview"));
    }
}
