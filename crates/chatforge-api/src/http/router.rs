//! Axum router configuration with middleware.
//!
//! All API routes are under `/api/v1/`; `/health` sits at the root.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/catalog", get(handlers::catalog::get_catalog))
        // Preview sessions
        .route("/sessions", post(handlers::session::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::session::get_session).delete(handlers::session::delete_session),
        )
        .route(
            "/sessions/{id}/config",
            put(handlers::session::update_config),
        )
        .route(
            "/sessions/{id}/features/{feature}/toggle",
            post(handlers::session::toggle_feature),
        )
        .route("/sessions/{id}/reset", post(handlers::session::reset_session))
        .route(
            "/sessions/{id}/messages",
            post(handlers::session::send_message),
        )
        // Embed & export
        .route("/embed", post(handlers::embed::embed))
        .route("/export/config", post(handlers::embed::export_config))
        .route("/export/html", post(handlers::embed::export_html));

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
