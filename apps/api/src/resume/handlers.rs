//! Axum route handlers for résumé intake.

use anyhow::anyhow;
use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::resume::extract::{extract_text, DocumentKind};
use crate::resume::normalize::normalize_resume;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub file_name: String,
    pub kind: DocumentKind,
    pub text: String,
    /// True when the LLM clean-up pass produced the returned text.
    pub normalized: bool,
}

/// Fields collected from the multipart upload.
#[derive(Default)]
struct Upload {
    file_name: Option<String>,
    bytes: Option<Bytes>,
    provider: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    normalize: Option<String>,
}

/// POST /api/v1/resume/extract
///
/// Multipart fields: `file` (required), `provider`, `model`, `api_key`,
/// `normalize` (default `true`). PDF and DOCX uploads are cleaned up by the
/// LLM when a provider and model are given; failures keep the raw text.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let upload = read_upload(multipart).await?;

    let (file_name, bytes) = match (upload.file_name, upload.bytes) {
        (Some(name), Some(bytes)) if !name.trim().is_empty() => (name, bytes),
        _ => return Err(AppError::Validation("file is required".to_string())),
    };

    let raw_text = {
        let file_name = file_name.clone();
        tokio::task::spawn_blocking(move || extract_text(&bytes, &file_name))
            .await
            .map_err(|e| AppError::Internal(anyhow!("Extraction task failed: {e}")))??
    };
    // Extraction already accepted the extension.
    let kind = DocumentKind::from_file_name(&file_name)?;

    let wants_normalize = upload
        .normalize
        .as_deref()
        .map_or(true, |v| !v.trim().eq_ignore_ascii_case("false"));

    let (text, normalized) = match (upload.provider, upload.model) {
        (Some(provider), Some(model)) if wants_normalize && kind.needs_normalization() => {
            let config = state.provider_config(provider, model, upload.api_key);
            let result = normalize_resume(state.adapter.as_ref(), &config, &raw_text).await;
            (result.text, result.formatted)
        }
        _ => (raw_text, false),
    };

    info!(
        "Extracted {:?} résumé '{}' ({} chars, normalized: {})",
        kind,
        file_name,
        text.len(),
        normalized
    );

    Ok(Json(ExtractResponse {
        file_name,
        kind,
        text,
        normalized,
    }))
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                upload.file_name = field.file_name().map(str::to_string);
                upload.bytes = Some(field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read uploaded file: {e}"))
                })?);
            }
            "provider" | "model" | "api_key" | "normalize" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid field '{name}': {e}")))?;
                let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                match name.as_str() {
                    "provider" => upload.provider = value,
                    "model" => upload.model = value,
                    "api_key" => upload.api_key = value,
                    _ => upload.normalize = value,
                }
            }
            _ => {}
        }
    }

    Ok(upload)
}
