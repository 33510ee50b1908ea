//! API key validation via a minimal completion call.

use serde::Serialize;
use tracing::info;

use crate::llm_client::{
    CompletionOptions, LlmError, ProviderAdapter, ProviderConfig, NORMALIZE_TEMPERATURE,
};

const PROBE_PROMPT: &str = "Hello";
const PROBE_MAX_TOKENS: u32 = 10;
const MAX_DETAIL_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCheck {
    pub valid: bool,
    pub message: String,
}

impl KeyCheck {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// Sends one tiny request with the given key and classifies the outcome.
pub async fn validate_api_key(adapter: &dyn ProviderAdapter, config: &ProviderConfig) -> KeyCheck {
    if config.api_key.trim().is_empty() {
        return KeyCheck::invalid("No API key provided");
    }

    let options = CompletionOptions::with_temperature(NORMALIZE_TEMPERATURE).max_tokens(PROBE_MAX_TOKENS);
    let result = match adapter.resolve(config, options) {
        Ok(completion) => completion.complete(PROBE_PROMPT).await,
        Err(e) => Err(e),
    };

    let check = match result {
        Ok(_) => KeyCheck {
            valid: true,
            message: "API key is valid".to_string(),
        },
        Err(e) => KeyCheck::invalid(classify(&e, &config.model)),
    };

    info!(
        "Key check for {} ({}): {}",
        config.provider, config.model, check.message
    );
    check
}

fn classify(error: &LlmError, model: &str) -> String {
    match error {
        e if e.is_configuration() => e.to_string(),
        LlmError::Api {
            status: 401 | 403, ..
        } => "Invalid API key".to_string(),
        LlmError::Api { status: 429, .. } => "Rate limited (but key is likely valid)".to_string(),
        LlmError::Api { status: 404, .. } => format!("Model '{model}' not available"),
        LlmError::Api { message, .. } if message.to_lowercase().contains("model") => {
            format!("Model '{model}' not available")
        }
        other => {
            let detail: String = other.to_string().chars().take(MAX_DETAIL_CHARS).collect();
            format!("Connection error: {detail}")
        }
    }
}
