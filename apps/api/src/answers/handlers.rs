//! Axum route handlers for the Answers API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::answers::orchestrator::{generate_answers, AnswerOutcome, AnswerRecord, GenerationRequest};
use crate::errors::AppError;
use crate::state::AppState;

pub const MIN_WORD_LIMIT: u32 = 20;
pub const MAX_WORD_LIMIT: u32 = 500;
const DEFAULT_WORD_LIMIT: u32 = 150;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GenerateAnswersBody {
    pub resume_text: String,
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default = "default_word_limit")]
    pub word_limit: u32,
    pub provider: String,
    pub model: String,
    /// Falls back to the server-side key for `provider` when absent.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub company_knowledge: Option<String>,
    #[serde(default)]
    pub company_research: Option<String>,
}

fn default_word_limit() -> u32 {
    DEFAULT_WORD_LIMIT
}

#[derive(Debug, Serialize)]
pub struct AnswerView {
    pub question: String,
    pub answer: String,
    pub status: &'static str,
}

impl From<AnswerRecord> for AnswerView {
    fn from(record: AnswerRecord) -> Self {
        let status = match record.outcome {
            AnswerOutcome::Answered { .. } => "answered",
            AnswerOutcome::Failed { .. } => "failed",
            AnswerOutcome::Misconfigured { .. } => "misconfigured",
        };
        Self {
            answer: record.answer().into_owned(),
            question: record.question,
            status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateAnswersResponse {
    pub answers: Vec<AnswerView>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/answers
///
/// Answers each question against the résumé. Provider failures are reported
/// per answer; only malformed input is rejected with 400.
pub async fn handle_generate_answers(
    State(state): State<AppState>,
    Json(body): Json<GenerateAnswersBody>,
) -> Result<Json<GenerateAnswersResponse>, AppError> {
    let request = validate_body(&state, body)?;

    let records = generate_answers(state.adapter.as_ref(), &request).await;

    Ok(Json(GenerateAnswersResponse {
        answers: records.into_iter().map(AnswerView::from).collect(),
    }))
}

fn validate_body(state: &AppState, body: GenerateAnswersBody) -> Result<GenerationRequest, AppError> {
    for (field, value) in [
        ("resume_text", &body.resume_text),
        ("role", &body.role),
        ("company", &body.company),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} cannot be empty")));
        }
    }

    if !(MIN_WORD_LIMIT..=MAX_WORD_LIMIT).contains(&body.word_limit) {
        return Err(AppError::Validation(format!(
            "word_limit must be between {MIN_WORD_LIMIT} and {MAX_WORD_LIMIT}"
        )));
    }

    let provider_config = state.provider_config(body.provider, body.model, body.api_key);

    Ok(GenerationRequest {
        resume_text: body.resume_text,
        role: body.role.trim().to_string(),
        company: body.company.trim().to_string(),
        questions: clean_questions(body.questions),
        word_limit: body.word_limit,
        provider_config,
        company_knowledge: body.company_knowledge,
        company_research: body.company_research,
    })
}

/// Trims each question and drops the blank ones, keeping order.
pub fn clean_questions(questions: Vec<String>) -> Vec<String> {
    questions
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_questions_trims_and_drops_blanks() {
        let cleaned = clean_questions(vec![
            "  Why us? ".to_string(),
            "".to_string(),
            "   ".to_string(),
            "Biggest win?".to_string(),
        ]);
        assert_eq!(cleaned, vec!["Why us?", "Biggest win?"]);
    }

    #[test]
    fn test_answer_view_renders_failure_text() {
        let view = AnswerView::from(AnswerRecord {
            question: "Q".to_string(),
            outcome: AnswerOutcome::Failed {
                message: "timeout".to_string(),
            },
        });
        assert_eq!(view.status, "failed");
        assert_eq!(view.answer, "Error generating answer: timeout");
    }
}
