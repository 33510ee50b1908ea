//! Résumé normalization — one low-temperature LLM pass that turns extracted
//! text into clean Markdown.
//!
//! Never blocks the pipeline: any failure falls back to the original text.

use tracing::{info, warn};

use crate::llm_client::prompts::fill_template;
use crate::llm_client::{
    CompletionOptions, LlmError, ProviderAdapter, ProviderConfig, NORMALIZE_TEMPERATURE,
};
use crate::resume::prompts::NORMALIZE_PROMPT_TEMPLATE;

/// Outcome of a normalization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedResume {
    pub text: String,
    /// False when the raw text was returned because the LLM pass was skipped or failed.
    pub formatted: bool,
}

/// Returns the cleaned résumé, `""` for blank input, or `raw_text` unchanged
/// when the provider cannot be resolved or the call fails.
pub async fn normalize_resume(
    adapter: &dyn ProviderAdapter,
    config: &ProviderConfig,
    raw_text: &str,
) -> NormalizedResume {
    if raw_text.trim().is_empty() {
        return NormalizedResume {
            text: String::new(),
            formatted: false,
        };
    }

    match try_normalize(adapter, config, raw_text).await {
        Ok(text) => {
            info!(
                "Résumé normalized ({} → {} chars)",
                raw_text.len(),
                text.len()
            );
            NormalizedResume {
                text,
                formatted: true,
            }
        }
        Err(e) => {
            warn!("Resume formatting failed, using original text: {}", e.with_hint());
            NormalizedResume {
                text: raw_text.to_string(),
                formatted: false,
            }
        }
    }
}

async fn try_normalize(
    adapter: &dyn ProviderAdapter,
    config: &ProviderConfig,
    raw_text: &str,
) -> Result<String, LlmError> {
    let completion = adapter.resolve(
        config,
        CompletionOptions::with_temperature(NORMALIZE_TEMPERATURE),
    )?;
    let prompt = fill_template(NORMALIZE_PROMPT_TEMPLATE, &[("raw_resume_text", raw_text)]);
    let text = completion.complete(&prompt).await?;
    match text.trim() {
        "" => Err(LlmError::EmptyContent),
        trimmed => Ok(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{server_error, FakeAdapter};
    use crate::llm_client::Provider;

    fn config() -> ProviderConfig {
        ProviderConfig::new("Claude", "claude-3-5-haiku-20241022", "sk-ant-test")
    }

    #[tokio::test]
    async fn test_blank_input_returns_empty_without_call() {
        let adapter = FakeAdapter::new();
        let result = normalize_resume(&adapter, &config(), " \n\t ").await;
        assert_eq!(result.text, "");
        assert!(!result.formatted);
        assert_eq!(adapter.resolve_count(), 0);
    }

    #[tokio::test]
    async fn test_success_returns_trimmed_completion() {
        let adapter = FakeAdapter::new().replying("\n  # Jane Doe\n\n## Experience  \n");
        let result = normalize_resume(&adapter, &config(), "JANE DOE experience").await;

        assert_eq!(result.text, "# Jane Doe\n\n## Experience");
        assert!(result.formatted);
        assert_eq!(adapter.complete_count(), 1);
        assert!(adapter.recorded_prompts()[0].contains("```\nJANE DOE experience\n```"));
        assert_eq!(adapter.recorded_options()[0].temperature, NORMALIZE_TEMPERATURE);
    }

    #[tokio::test]
    async fn test_call_failure_returns_original_text() {
        let adapter = FakeAdapter::new().failing_all(server_error);
        let result = normalize_resume(&adapter, &config(), "X").await;
        assert_eq!(result.text, "X");
        assert!(!result.formatted);
    }

    #[tokio::test]
    async fn test_configuration_failure_returns_original_text() {
        let adapter = FakeAdapter::new().rejecting(|| LlmError::MissingApiKey(Provider::OpenAI));
        let result = normalize_resume(&adapter, &config(), "raw résumé").await;
        assert_eq!(result.text, "raw résumé");
        assert!(!result.formatted);
        assert_eq!(adapter.complete_count(), 0);
    }

    #[tokio::test]
    async fn test_reply_identical_to_input_still_counts_as_formatted() {
        let adapter = FakeAdapter::new().replying("# Jane Doe");
        let result = normalize_resume(&adapter, &config(), "# Jane Doe").await;

        assert_eq!(result.text, "# Jane Doe");
        assert!(result.formatted);
    }

    #[tokio::test]
    async fn test_whitespace_reply_falls_back_to_original() {
        let adapter = FakeAdapter::new().replying(" \n ");
        let result = normalize_resume(&adapter, &config(), "raw résumé").await;

        assert_eq!(result.text, "raw résumé");
        assert!(!result.formatted);
    }
}
