//! LLM Client — the single point of entry for every provider call in the coach.
//!
//! ARCHITECTURAL RULE: No other module may talk to a provider API directly.
//! Callers resolve a [`Completion`] through a [`ProviderAdapter`] and only ever
//! see `complete(prompt) -> text`.
//!
//! Three backends are supported: Google (Gemini), OpenAI and Claude (Anthropic).
//! Wire formats live in [`providers`].
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub mod prompts;
pub mod providers;

#[cfg(test)]
pub(crate) mod testing;

use providers::{ClaudeCompletion, GeminiCompletion, OpenAiCompletion, Target};

/// Temperature used for interview answers.
pub const ANSWER_TEMPERATURE: f64 = 0.3;
/// Temperature used for résumé clean-up and key checks.
pub const NORMALIZE_TEMPERATURE: f64 = 0.1;

pub const GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const OPENAI_API_BASE: &str = "https://api.openai.com";
pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";

// ────────────────────────────────────────────────────────────────────────────
// Provider identity
// ────────────────────────────────────────────────────────────────────────────

/// The closed set of hosted LLM services the coach can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Provider {
    Google,
    OpenAI,
    Claude,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Google, Provider::OpenAI, Provider::Claude];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "Google",
            Provider::OpenAI => "OpenAI",
            Provider::Claude => "Claude",
        }
    }

    /// Name of the company issuing the API key, as shown to users.
    pub fn vendor(&self) -> &'static str {
        match self {
            Provider::Google => "Google",
            Provider::OpenAI => "OpenAI",
            Provider::Claude => "Anthropic",
        }
    }

    pub fn key_console_hint(&self) -> &'static str {
        match self {
            Provider::Google => "Verify your Google API key at https://aistudio.google.com/app/apikey",
            Provider::OpenAI => "Verify your OpenAI API key at https://platform.openai.com/api-keys",
            Provider::Claude => "Verify your Anthropic API key at https://console.anthropic.com/",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" | "gemini" => Ok(Provider::Google),
            "openai" => Ok(Provider::OpenAI),
            "claude" | "anthropic" => Ok(Provider::Claude),
            _ => Err(LlmError::UnsupportedProvider(s.trim().to_string())),
        }
    }
}

/// Caller-supplied provider selection. The provider name stays raw until
/// resolution so an unknown name surfaces as a configuration error there.
#[derive(Clone)]
pub struct ProviderConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
}

impl ProviderConfig {
    pub fn new(
        provider: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .finish()
    }
}

/// Sampling options bound into a [`Completion`] at resolution time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f64,
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    pub fn with_temperature(temperature: f64) -> Self {
        Self {
            temperature,
            max_tokens: None,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{} API Key not provided.", .0.vendor())]
    MissingApiKey(Provider),

    #[error("Unsupported model provider: {0}")]
    UnsupportedProvider(String),

    #[error("No model selected for {0}")]
    MissingModel(Provider),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// True for errors raised while resolving a provider, before any network call.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LlmError::MissingApiKey(_) | LlmError::UnsupportedProvider(_) | LlmError::MissingModel(_)
        )
    }

    /// A short remediation tip for the user, when one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            LlmError::MissingApiKey(provider) | LlmError::MissingModel(provider) => {
                Some(provider.key_console_hint())
            }
            LlmError::Api { status: 429, .. } => {
                Some("You may have hit API rate limits. Try again in a few moments.")
            }
            LlmError::Api {
                status: 401 | 403, ..
            } => Some("Please check your API key is valid and has sufficient credits."),
            LlmError::Http(e) if e.is_connect() || e.is_timeout() => {
                Some("Network connection issue. Please check your internet connection.")
            }
            _ => None,
        }
    }

    /// The error message followed by its hint on a second line.
    pub fn with_hint(&self) -> String {
        match self.hint() {
            Some(hint) => format!("{self}\nHint: {hint}"),
            None => self.to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Adapter seam
// ────────────────────────────────────────────────────────────────────────────

/// A text-completion capability bound to one provider, model and temperature.
/// Each call issues exactly one request; there are no retries.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Turns a [`ProviderConfig`] into a [`Completion`].
///
/// Carried in `AppState` as `Arc<dyn ProviderAdapter>` so tests can swap in a
/// scripted backend without touching the orchestrator.
pub trait ProviderAdapter: Send + Sync {
    fn resolve(
        &self,
        config: &ProviderConfig,
        options: CompletionOptions,
    ) -> Result<Box<dyn Completion>, LlmError>;
}

/// Base URLs for each provider. Overridable so deployments can route through a
/// proxy and tests can point at a mock server.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub google: String,
    pub openai: String,
    pub anthropic: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            google: GOOGLE_API_BASE.to_string(),
            openai: OPENAI_API_BASE.to_string(),
            anthropic: ANTHROPIC_API_BASE.to_string(),
        }
    }
}

impl ProviderEndpoints {
    /// Points every provider at the same base URL.
    #[cfg(test)]
    pub fn uniform(base_url: &str) -> Self {
        Self {
            google: base_url.to_string(),
            openai: base_url.to_string(),
            anthropic: base_url.to_string(),
        }
    }

    pub fn base_for(&self, provider: Provider) -> &str {
        let base = match provider {
            Provider::Google => &self.google,
            Provider::OpenAI => &self.openai,
            Provider::Claude => &self.anthropic,
        };
        base.trim_end_matches('/')
    }
}

/// The production adapter: one shared `reqwest::Client`, one wire format per provider.
#[derive(Clone)]
pub struct HttpProviderAdapter {
    client: Client,
    endpoints: ProviderEndpoints,
}

impl HttpProviderAdapter {
    pub fn new(endpoints: ProviderEndpoints, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoints })
    }
}

impl ProviderAdapter for HttpProviderAdapter {
    fn resolve(
        &self,
        config: &ProviderConfig,
        options: CompletionOptions,
    ) -> Result<Box<dyn Completion>, LlmError> {
        let provider: Provider = config.provider.parse()?;

        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(LlmError::MissingApiKey(provider));
        }

        let model = config.model.trim();
        if model.is_empty() {
            return Err(LlmError::MissingModel(provider));
        }

        debug!(
            "Resolved {} completion (model: {}, temperature: {})",
            provider, model, options.temperature
        );

        let target = Target {
            client: self.client.clone(),
            base_url: self.endpoints.base_for(provider).to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            options,
        };

        Ok(match provider {
            Provider::Google => Box::new(GeminiCompletion(target)),
            Provider::OpenAI => Box::new(OpenAiCompletion(target)),
            Provider::Claude => Box::new(ClaudeCompletion(target)),
        })
    }
}
