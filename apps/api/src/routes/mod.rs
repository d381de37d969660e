pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health::health_handler))
        .route("/health", get(health::health_handler))
        // CV analysis API
        .route(
            "/api/v1/cv-analysis/analyze",
            post(handlers::handle_analyze),
        )
        .route(
            "/api/v1/cv-analysis/batch-analyze",
            post(handlers::handle_batch_analyze),
        )
        .route(
            "/api/v1/cv-analysis/analyze-text",
            post(handlers::handle_analyze_text),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
