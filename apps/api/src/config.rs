use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{
    Provider, ProviderEndpoints, ANTHROPIC_API_BASE, GOOGLE_API_BASE, OPENAI_API_BASE,
};

/// Application configuration loaded from environment variables.
/// Nothing is required: provider keys are optional fallbacks for requests
/// that do not carry their own.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub api_keys: ApiKeys,
    pub endpoints: ProviderEndpoints,
    pub llm_timeout: Duration,
}

/// Server-side API keys, one per provider.
#[derive(Clone, Default)]
pub struct ApiKeys {
    pub google: Option<String>,
    pub openai: Option<String>,
    pub anthropic: Option<String>,
}

impl ApiKeys {
    pub fn for_provider(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Google => self.google.as_deref(),
            Provider::OpenAI => self.openai.as_deref(),
            Provider::Claude => self.anthropic.as_deref(),
        }
    }
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("google", &self.google.is_some())
            .field("openai", &self.openai.is_some())
            .field("anthropic", &self.anthropic.is_some())
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            api_keys: ApiKeys {
                google: optional_env("GOOGLE_API_KEY"),
                openai: optional_env("OPENAI_API_KEY"),
                anthropic: optional_env("ANTHROPIC_API_KEY"),
            },
            endpoints: ProviderEndpoints {
                google: optional_env("GOOGLE_API_BASE").unwrap_or_else(|| GOOGLE_API_BASE.to_string()),
                openai: optional_env("OPENAI_API_BASE").unwrap_or_else(|| OPENAI_API_BASE.to_string()),
                anthropic: optional_env("ANTHROPIC_API_BASE")
                    .unwrap_or_else(|| ANTHROPIC_API_BASE.to_string()),
            },
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 120)?),
        })
    }
}

/// Reads a variable, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        None => Ok(default),
    }
}
