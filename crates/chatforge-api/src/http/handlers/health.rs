//! Liveness endpoint.

use axum::Json;
use axum::extract::State;
use serde_json::json;

use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "provider": state.engine.provider_name(),
        "model": state.global_config.completion.settings.model,
        "sessions": state.sessions.len(),
    }))
}
