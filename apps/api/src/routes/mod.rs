pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::answers::handlers::handle_generate_answers;
use crate::catalog::handlers::{handle_estimate, handle_models, handle_validate_key};
use crate::resume::handlers::handle_extract;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Résumé intake
        .route("/api/v1/resume/extract", post(handle_extract))
        // Answer generation
        .route("/api/v1/answers", post(handle_generate_answers))
        // Catalog helpers
        .route("/api/v1/models", get(handle_models))
        .route("/api/v1/estimate", post(handle_estimate))
        .route("/api/v1/keys/validate", post(handle_validate_key))
        .with_state(state)
}
