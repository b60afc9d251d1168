//! Preview session handlers: create, inspect, edit, chat, reset, delete.
//!
//! Every session is independent. A message is sent on a spawned task so the
//! reply still lands in the transcript when the client disconnects mid-turn.

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use chatforge_core::chat::prompt::{build_personality, build_welcome_message};
use chatforge_types::chatbot::{ChatbotConfig, Feature, is_valid_hex_color};
use chatforge_types::error::ConfigError;

use crate::http::error::AppError;
use crate::http::handlers::masked_config;
use crate::http::response::ApiResponse;
use crate::state::{AppState, PreviewSession};

/// Request body for sending a message.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

fn lookup(state: &AppState, id: &str) -> Result<Arc<PreviewSession>, AppError> {
    let uuid: Uuid = id.parse().map_err(|_| AppError::NotFound(id.to_string()))?;
    state
        .session(&uuid)
        .ok_or_else(|| AppError::NotFound(id.to_string()))
}

fn check_color(config: &ChatbotConfig) -> Result<(), AppError> {
    if is_valid_hex_color(&config.primary_color) {
        Ok(())
    } else {
        Err(ConfigError::InvalidColor(config.primary_color.clone()).into())
    }
}

async fn session_json(session: &PreviewSession) -> Result<serde_json::Value, AppError> {
    let config = session.config.read().await;
    let conversation = session.conversation.lock().await;
    let personality = build_personality(&config);

    Ok(json!({
        "id": session.id,
        "createdAt": session.created_at,
        "config": masked_config(&config)?,
        "hasCredential": config.has_credential(),
        "personality": { "role": personality.role, "tone": personality.tone },
        "welcomeMessage": build_welcome_message(&config),
        "inFlight": conversation.is_in_flight(),
        "transcript": conversation.transcript(),
    }))
}

fn session_links(
    resp: ApiResponse<serde_json::Value>,
    id: &Uuid,
) -> ApiResponse<serde_json::Value> {
    resp.with_link("self", &format!("/api/v1/sessions/{id}"))
        .with_link("messages", &format!("/api/v1/sessions/{id}/messages"))
}

/// POST /api/v1/sessions - Start a preview session for a chatbot config.
pub async fn create_session(
    State(state): State<AppState>,
    Json(config): Json<ChatbotConfig>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    check_color(&config)?;
    let session = state.open_session(config);
    let data = session_json(&session).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(session_links(
        ApiResponse::success(data, request_id, elapsed),
        &session.id,
    )))
}

/// GET /api/v1/sessions/:id - Config, personality and transcript of a session.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = lookup(&state, &id)?;
    let data = session_json(&session).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(session_links(
        ApiResponse::success(data, request_id, elapsed),
        &session.id,
    )))
}

/// DELETE /api/v1/sessions/:id - Close a session, cancelling any pending reply.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = lookup(&state, &id)?;
    state.close_session(&session.id).await;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        json!({ "deleted": true, "id": session.id }),
        request_id,
        elapsed,
    )))
}

/// PUT /api/v1/sessions/:id/config - Replace the session's chatbot config.
///
/// The transcript is kept; later turns use the new config.
pub async fn update_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(config): Json<ChatbotConfig>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = lookup(&state, &id)?;
    check_color(&config)?;
    *session.config.write().await = config;
    tracing::debug!(session_id = %session.id, "Session config replaced");
    let data = session_json(&session).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(session_links(
        ApiResponse::success(data, request_id, elapsed),
        &session.id,
    )))
}

/// POST /api/v1/sessions/:id/features/:feature/toggle - Flip one feature.
pub async fn toggle_feature(
    State(state): State<AppState>,
    Path((id, feature)): Path<(String, String)>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = lookup(&state, &id)?;
    let feature: Feature = feature.parse().map_err(AppError::Validation)?;
    let (enabled, features) = {
        let mut config = session.config.write().await;
        let enabled = config.features.toggle(feature);
        (enabled, config.features.clone())
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        json!({ "feature": feature, "enabled": enabled, "features": features }),
        request_id,
        elapsed,
    )))
}

/// POST /api/v1/sessions/:id/reset - Reseed the transcript with the welcome message.
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = lookup(&state, &id)?;
    {
        let config = session.config.read().await;
        session.conversation.lock().await.reset(&config);
    }
    let data = session_json(&session).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(session_links(
        ApiResponse::success(data, request_id, elapsed),
        &session.id,
    )))
}

/// POST /api/v1/sessions/:id/messages - Send a message and wait for the reply.
///
/// Provider failures come back as a normal bot entry; only a rejected or
/// cancelled turn is an error response.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = lookup(&state, &id)?;
    let config = session.config.read().await.clone();

    let engine = state.engine.clone();
    let turn_session = session.clone();
    let turn = tokio::spawn(async move {
        engine
            .send_message(
                &turn_session.conversation,
                &config,
                &body.message,
                &turn_session.cancel,
            )
            .await
    });
    let reply = turn
        .await
        .map_err(|e| AppError::Internal(format!("turn task failed: {e}")))??;

    let transcript = session.conversation.lock().await.transcript().clone();
    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(session_links(
        ApiResponse::success(
            json!({ "reply": reply, "transcript": transcript }),
            request_id,
            elapsed,
        ),
        &session.id,
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Notify;

    use chatforge_types::chatbot::Purpose;
    use chatforge_types::error::ChatError;

    use super::*;
    use crate::http::handlers::test_support::{
        GatedProvider, acme_config, echo_state, state_with,
    };

    fn message(text: &str) -> Json<SendMessageRequest> {
        Json(SendMessageRequest {
            message: text.to_string(),
        })
    }

    async fn create(state: &AppState, config: ChatbotConfig) -> String {
        let Json(resp) = create_session(State(state.clone()), Json(config))
            .await
            .unwrap();
        resp.data.unwrap()["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_session_masks_credential() {
        let state = echo_state();
        let Json(resp) = create_session(State(state.clone()), Json(acme_config()))
            .await
            .unwrap();
        let data = resp.data.unwrap();

        assert_ne!(data["config"]["apiKey"], "gsk_test_secret_1234");
        assert_eq!(data["hasCredential"], true);
        assert_eq!(data["inFlight"], false);
        assert_eq!(data["transcript"].as_array().map(Vec::len), Some(1));
        assert!(resp.links.contains_key("messages"));
        assert_eq!(state.sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_create_session_rejects_bad_color() {
        let state = echo_state();
        let config = ChatbotConfig {
            primary_color: "blue".into(),
            ..acme_config()
        };
        let err = create_session(State(state.clone()), Json(config))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::InvalidColor(_))));
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_send_message_appends_reply() {
        let state = echo_state();
        let id = create(&state, acme_config()).await;

        let Json(resp) = send_message(State(state.clone()), Path(id.clone()), message("hi"))
            .await
            .unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data["reply"]["text"], "echo: hi");
        assert_eq!(data["reply"]["sender"], "bot");
        assert_eq!(data["transcript"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_send_blank_message_rejected() {
        let state = echo_state();
        let id = create(&state, acme_config()).await;

        let err = send_message(State(state), Path(id), message("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Chat(ChatError::EmptyMessage)));
    }

    #[tokio::test]
    async fn test_missing_credential_reported_in_transcript() {
        let state = echo_state();
        let config = ChatbotConfig {
            api_key: String::new(),
            ..acme_config()
        };
        let id = create(&state, config).await;

        let Json(resp) = send_message(State(state), Path(id), message("hi"))
            .await
            .unwrap();
        let text = resp.data.unwrap()["reply"]["text"].as_str().unwrap().to_string();
        assert_eq!(text, ChatError::MissingCredential.transcript_text());
    }

    #[tokio::test]
    async fn test_unknown_session_not_found() {
        let state = echo_state();
        let err = get_session(State(state.clone()), Path("not-a-uuid".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = get_session(State(state), Path(Uuid::now_v7().to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_toggle_feature_twice_restores() {
        let state = echo_state();
        let id = create(&state, acme_config()).await;

        let Json(first) = toggle_feature(
            State(state.clone()),
            Path((id.clone(), "leadCapture".into())),
        )
        .await
        .unwrap();
        assert_eq!(first.data.unwrap()["enabled"], true);

        let Json(second) =
            toggle_feature(State(state.clone()), Path((id, "leadCapture".into())))
                .await
                .unwrap();
        let data = second.data.unwrap();
        assert_eq!(data["enabled"], false);
        assert_eq!(data["features"], json!([]));
    }

    #[tokio::test]
    async fn test_toggle_unknown_feature_rejected() {
        let state = echo_state();
        let id = create(&state, acme_config()).await;
        let err = toggle_feature(State(state), Path((id, "teleport".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_config_changes_later_turns() {
        let state = echo_state();
        let id = create(&state, acme_config()).await;
        let renamed = ChatbotConfig {
            company_name: "Globex".into(),
            purpose: Purpose::Leads,
            ..acme_config()
        };

        let Json(resp) = update_config(State(state.clone()), Path(id.clone()), Json(renamed))
            .await
            .unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data["config"]["companyName"], "Globex");
        // The welcome entry from the original config stays until reset.
        assert_eq!(data["transcript"].as_array().map(Vec::len), Some(1));

        let Json(reset) = reset_session(State(state), Path(id)).await.unwrap();
        let data = reset.data.unwrap();
        let welcome = data["transcript"][0]["text"].as_str().unwrap();
        assert!(welcome.contains("Globex"));
    }

    #[tokio::test]
    async fn test_reset_clears_history() {
        let state = echo_state();
        let id = create(&state, acme_config()).await;
        send_message(State(state.clone()), Path(id.clone()), message("hi"))
            .await
            .unwrap();

        let Json(resp) = reset_session(State(state), Path(id)).await.unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data["transcript"].as_array().map(Vec::len), Some(1));
    }

    fn gated_state() -> (AppState, Arc<Notify>, Arc<Notify>, Arc<AtomicUsize>) {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let state = state_with(GatedProvider {
            started: started.clone(),
            release: release.clone(),
            calls: calls.clone(),
        });
        (state, started, release, calls)
    }

    #[tokio::test]
    async fn test_second_message_while_pending_is_busy() {
        let (state, started, release, calls) = gated_state();
        let id = create(&state, acme_config()).await;

        let first = tokio::spawn(send_message(
            State(state.clone()),
            Path(id.clone()),
            message("one"),
        ));
        started.notified().await;

        let err = send_message(State(state.clone()), Path(id), message("two"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Chat(ChatError::Busy)));

        release.notify_one();
        let Json(resp) = first.await.unwrap().unwrap();
        assert_eq!(resp.data.unwrap()["reply"]["text"], "late reply");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delete_cancels_pending_reply() {
        let (state, started, _release, _calls) = gated_state();
        let id = create(&state, acme_config()).await;

        let pending = tokio::spawn(send_message(
            State(state.clone()),
            Path(id.clone()),
            message("hello"),
        ));
        started.notified().await;

        delete_session(State(state.clone()), Path(id)).await.unwrap();
        let err = pending.await.unwrap().unwrap_err();
        assert!(matches!(err, AppError::Chat(ChatError::Cancelled)));
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let (state, started, release, _calls) = gated_state();
        let busy = create(&state, acme_config()).await;
        let other = create(&state, acme_config()).await;

        let pending = tokio::spawn(send_message(
            State(state.clone()),
            Path(busy),
            message("one"),
        ));
        started.notified().await;

        let Json(resp) = get_session(State(state.clone()), Path(other)).await.unwrap();
        assert_eq!(resp.data.unwrap()["inFlight"], false);

        release.notify_one();
        pending.await.unwrap().unwrap();
    }
}
