//! Answer Generation — turns a résumé and a batch of interview questions into
//! one answer record per question.
//!
//! Flow: resolve provider once → build company context once →
//!       for each question: build prompt → complete → record outcome.
//!
//! `generate_answers` never fails. Provider problems are recorded per question,
//! and a provider that cannot be resolved marks every question as misconfigured.

use std::borrow::Cow;

use serde::Serialize;
use tracing::{info, warn};

use crate::answers::prompts::{ANSWER_PROMPT_TEMPLATE, CULTURE_GUIDELINE};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{CompletionOptions, ProviderAdapter, ProviderConfig, ANSWER_TEMPERATURE};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Everything needed to answer one batch of questions.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub resume_text: String,
    pub role: String,
    pub company: String,
    /// Trimmed, non-empty questions in the order they must be answered.
    pub questions: Vec<String>,
    pub word_limit: u32,
    pub provider_config: ProviderConfig,
    /// Free-text company knowledge supplied by the user.
    pub company_knowledge: Option<String>,
    /// Company research findings, if any were gathered.
    pub company_research: Option<String>,
}

/// How a single question was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnswerOutcome {
    Answered { text: String },
    /// The completion call for this question failed.
    Failed { message: String },
    /// The provider could not be resolved; shared by the whole batch.
    Misconfigured { message: String },
}

/// One question paired with its outcome. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub question: String,
    #[serde(flatten)]
    pub outcome: AnswerOutcome,
}

impl AnswerRecord {
    /// The answer as shown to the user, with failures rendered as text.
    pub fn answer(&self) -> Cow<'_, str> {
        match &self.outcome {
            AnswerOutcome::Answered { text } => Cow::Borrowed(text),
            AnswerOutcome::Failed { message } => {
                Cow::Owned(format!("Error generating answer: {message}"))
            }
            AnswerOutcome::Misconfigured { message } => {
                Cow::Owned(format!("Configuration Error: {message}"))
            }
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.outcome, AnswerOutcome::Answered { .. })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Answers every question in `request`, preserving order and length.
///
/// Steps:
/// 1. Empty batch → `[]` without touching the adapter.
/// 2. Resolve the provider once; on failure every question gets the same
///    `Misconfigured` outcome.
/// 3. Build the company context once.
/// 4. For each question, one completion call; a failed call only affects its
///    own record.
pub async fn generate_answers(
    adapter: &dyn ProviderAdapter,
    request: &GenerationRequest,
) -> Vec<AnswerRecord> {
    if request.questions.is_empty() {
        return Vec::new();
    }

    let completion = match adapter.resolve(
        &request.provider_config,
        CompletionOptions::with_temperature(ANSWER_TEMPERATURE),
    ) {
        Ok(completion) => completion,
        Err(e) => {
            warn!(
                "Provider configuration failed for {} questions: {e}",
                request.questions.len()
            );
            let outcome = AnswerOutcome::Misconfigured {
                message: e.with_hint(),
            };
            return request
                .questions
                .iter()
                .map(|question| AnswerRecord {
                    question: question.clone(),
                    outcome: outcome.clone(),
                })
                .collect();
        }
    };

    let company_context = build_company_context(
        &request.company,
        request.company_knowledge.as_deref(),
        request.company_research.as_deref(),
    );

    let mut records = Vec::with_capacity(request.questions.len());
    for (index, question) in request.questions.iter().enumerate() {
        let prompt = build_answer_prompt(request, &company_context, question);

        let outcome = match completion.complete(&prompt).await {
            Ok(text) => AnswerOutcome::Answered { text },
            Err(e) => {
                warn!("Question {} failed: {e}", index + 1);
                AnswerOutcome::Failed {
                    message: e.to_string(),
                }
            }
        };

        records.push(AnswerRecord {
            question: question.clone(),
            outcome,
        });
    }

    info!(
        "Generated {}/{} answers for {} at {}",
        records.iter().filter(|r| r.is_answered()).count(),
        records.len(),
        request.role,
        request.company
    );

    records
}

/// Joins the optional company knowledge and research into one labelled block.
/// Returns an empty string when neither has content.
pub fn build_company_context(
    company: &str,
    knowledge: Option<&str>,
    research: Option<&str>,
) -> String {
    let mut context = String::new();

    if let Some(knowledge) = knowledge.map(str::trim).filter(|s| !s.is_empty()) {
        context.push_str(&format!(
            "\n\nAdditional information about {company}:\n{knowledge}"
        ));
    }
    if let Some(research) = research.map(str::trim).filter(|s| !s.is_empty()) {
        context.push_str(&format!(
            "\n\nResearch findings about {company}:\n{research}"
        ));
    }

    context
}

/// Renders the answer prompt for one question.
pub fn build_answer_prompt(
    request: &GenerationRequest,
    company_context: &str,
    question: &str,
) -> String {
    let word_limit = request.word_limit.to_string();
    let culture_guideline = if company_context.is_empty() {
        ""
    } else {
        CULTURE_GUIDELINE
    };

    fill_template(
        ANSWER_PROMPT_TEMPLATE,
        &[
            ("resume", &request.resume_text),
            ("role", &request.role),
            ("company", &request.company),
            ("company_context", company_context),
            ("word_limit", &word_limit),
            ("question", question),
            ("culture_guideline", culture_guideline),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{server_error, FakeAdapter};
    use crate::llm_client::{LlmError, Provider};

    fn request(questions: &[&str]) -> GenerationRequest {
        GenerationRequest {
            resume_text: "# Jane Doe\n- Cut p99 latency by 40% at Initech".to_string(),
            role: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            questions: questions.iter().map(|q| q.to_string()).collect(),
            word_limit: 150,
            provider_config: ProviderConfig::new("OpenAI", "gpt-4o-mini", "sk-test"),
            company_knowledge: None,
            company_research: None,
        }
    }

    #[tokio::test]
    async fn test_empty_batch_skips_provider() {
        let adapter = FakeAdapter::new();
        let records = generate_answers(&adapter, &request(&[])).await;

        assert!(records.is_empty());
        assert_eq!(adapter.resolve_count(), 0);
        assert_eq!(adapter.complete_count(), 0);
    }

    #[tokio::test]
    async fn test_output_preserves_order_and_length() {
        let adapter = FakeAdapter::new();
        let questions = ["Why Acme?", "Biggest failure?", "Where in five years?"];
        let records = generate_answers(&adapter, &request(&questions)).await;

        assert_eq!(records.len(), 3);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.question, questions[i]);
            assert_eq!(record.answer(), format!("reply {}", i + 1));
        }
        assert_eq!(adapter.resolve_count(), 1, "adapter resolved once per batch");
        assert_eq!(adapter.complete_count(), 3);
    }

    #[tokio::test]
    async fn test_answer_temperature_is_bound_at_resolution() {
        let adapter = FakeAdapter::new();
        generate_answers(&adapter, &request(&["Why Acme?"])).await;

        let options = adapter.recorded_options();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].temperature, ANSWER_TEMPERATURE);
        assert_eq!(options[0].max_tokens, None);
    }

    #[tokio::test]
    async fn test_configuration_failure_is_broadcast() {
        let adapter = FakeAdapter::new().rejecting(|| LlmError::MissingApiKey(Provider::Google));
        let records = generate_answers(&adapter, &request(&["One?", "Two?", "Three?"])).await;

        assert_eq!(records.len(), 3);
        let first = records[0].answer().into_owned();
        assert!(first.starts_with("Configuration Error: Google API Key not provided."));
        assert!(first.contains("aistudio.google.com"));
        assert!(records.iter().all(|r| r.answer() == first));
        assert!(records.iter().all(|r| !r.is_answered()));
        assert_eq!(adapter.complete_count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_provider_is_broadcast() {
        let adapter = FakeAdapter::new();
        let mut req = request(&["One?", "Two?"]);
        req.provider_config.provider = "Mistral".to_string();

        let records = generate_answers(&adapter, &req).await;

        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(
                record.outcome,
                AnswerOutcome::Misconfigured {
                    message: "Unsupported model provider: Mistral".to_string()
                }
            );
        }
    }

    #[tokio::test]
    async fn test_single_failure_is_isolated() {
        let adapter = FakeAdapter::new().failing_on("BOOM", server_error);
        let records =
            generate_answers(&adapter, &request(&["First?", "BOOM second?", "Third?"])).await;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].answer(), "reply 1");
        assert!(records[1]
            .answer()
            .starts_with("Error generating answer: API error (status 500)"));
        assert_eq!(records[1].question, "BOOM second?");
        assert_eq!(records[2].answer(), "reply 3");
        assert_eq!(adapter.complete_count(), 3, "batch continued after the failure");
    }

    #[tokio::test]
    async fn test_every_call_failing_still_yields_full_batch() {
        let adapter = FakeAdapter::new().failing_all(|| LlmError::EmptyContent);
        let records = generate_answers(&adapter, &request(&["A?", "B?"])).await;

        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(
                record.answer(),
                "Error generating answer: LLM returned empty content"
            );
        }
    }

    #[tokio::test]
    async fn test_identical_requests_are_resent() {
        let adapter = FakeAdapter::new();
        let req = request(&["Why Acme?"]);
        generate_answers(&adapter, &req).await;
        generate_answers(&adapter, &req).await;

        assert_eq!(adapter.complete_count(), 2);
    }

    #[tokio::test]
    async fn test_prompt_embeds_request_fields() {
        let adapter = FakeAdapter::new();
        let mut req = request(&["Tell me about a conflict."]);
        req.company_knowledge = Some("Acme builds rockets for coyotes.".to_string());
        generate_answers(&adapter, &req).await;

        let prompt = &adapter.recorded_prompts()[0];
        assert!(prompt.contains("Cut p99 latency by 40%"));
        assert!(prompt.contains("**Backend Engineer** at **Acme**"));
        assert!(prompt.contains("≤ 150 words"));
        assert!(prompt.contains("Tell me about a conflict."));
        assert!(prompt.contains("Additional information about Acme:\nAcme builds rockets"));
        assert!(prompt.contains("mission, values or culture"));
    }

    #[test]
    fn test_context_empty_when_both_inputs_blank() {
        assert_eq!(build_company_context("Acme", Some(""), Some("")), "");
        assert_eq!(build_company_context("Acme", Some("  \n"), None), "");
        assert_eq!(build_company_context("Acme", None, None), "");
    }

    #[test]
    fn test_context_with_knowledge_only_omits_research_header() {
        let context = build_company_context("Acme", Some("  Values: frugality "), None);
        assert_eq!(context, "\n\nAdditional information about Acme:\nValues: frugality");
        assert!(!context.contains("Research findings"));
    }

    #[test]
    fn test_context_with_both_sections_keeps_order() {
        let context = build_company_context("Acme", Some("K"), Some("R"));
        assert_eq!(
            context,
            "\n\nAdditional information about Acme:\nK\n\nResearch findings about Acme:\nR"
        );
    }

    #[test]
    fn test_prompt_without_context_skips_culture_guideline() {
        let req = request(&["Why you?"]);
        let prompt = build_answer_prompt(&req, "", "Why you?");

        assert!(prompt.contains("at **Acme**."));
        assert!(!prompt.contains("mission, values or culture"));
        assert!(!prompt.contains("{"), "no unfilled placeholders: {prompt}");
    }

    #[test]
    fn test_record_serializes_with_status_tag() {
        let record = AnswerRecord {
            question: "Q".to_string(),
            outcome: AnswerOutcome::Failed {
                message: "timeout".to_string(),
            },
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"question": "Q", "status": "failed", "message": "timeout"})
        );
    }
}
