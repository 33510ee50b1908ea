//! Axum route handlers for the catalog helpers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::catalog::cost::{estimate_cost, CostEstimate};
use crate::catalog::key_check::{validate_api_key, KeyCheck};
use crate::catalog::models::{catalog, ProviderModels};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub providers: Vec<ProviderModels>,
}

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub provider: String,
    pub model: String,
    pub resume_chars: usize,
    pub num_questions: usize,
    pub word_limit: u32,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub estimate: CostEstimate,
    pub usd: Option<f64>,
}

#[derive(Deserialize)]
pub struct ValidateKeyRequest {
    pub provider: String,
    pub model: String,
    /// Falls back to the server-side key for `provider` when absent.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// GET /api/v1/models
pub async fn handle_models() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        providers: catalog(),
    })
}

/// POST /api/v1/estimate
pub async fn handle_estimate(
    Json(request): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    if request.model.trim().is_empty() {
        return Err(AppError::Validation("model cannot be empty".to_string()));
    }

    let estimate = estimate_cost(
        &request.provider,
        &request.model,
        request.resume_chars,
        request.num_questions,
        request.word_limit,
    );

    Ok(Json(EstimateResponse {
        usd: estimate.usd(),
        estimate,
    }))
}

/// POST /api/v1/keys/validate
///
/// Always 200: an invalid key is a result, not an error.
pub async fn handle_validate_key(
    State(state): State<AppState>,
    Json(request): Json<ValidateKeyRequest>,
) -> Json<KeyCheck> {
    let config = state.provider_config(request.provider, request.model, request.api_key);
    Json(validate_api_key(state.adapter.as_ref(), &config).await)
}
