//! Suggested models per provider. Any non-blank model name is accepted by the
//! adapter; this list only feeds model pickers.

use serde::Serialize;

use crate::llm_client::Provider;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelInfo {
    pub name: &'static str,
    pub description: &'static str,
}

const GOOGLE_MODELS: &[ModelInfo] = &[
    ModelInfo { name: "gemini-2.0-flash-exp", description: "Latest experimental - fastest & most capable" },
    ModelInfo { name: "gemini-1.5-pro-latest", description: "Production-ready - best balance" },
    ModelInfo { name: "gemini-1.5-pro", description: "Stable pro - complex reasoning" },
    ModelInfo { name: "gemini-1.5-flash", description: "Fast - good for quick tasks" },
    ModelInfo { name: "gemini-1.5-flash-8b", description: "Smallest - ultra fast" },
];

const OPENAI_MODELS: &[ModelInfo] = &[
    ModelInfo { name: "gpt-4o", description: "Latest GPT-4 - most capable" },
    ModelInfo { name: "gpt-4o-mini", description: "Smaller GPT-4 - good value" },
    ModelInfo { name: "gpt-4-turbo", description: "Fast GPT-4 - optimized speed" },
    ModelInfo { name: "gpt-4", description: "Original GPT-4 - reliable" },
    ModelInfo { name: "gpt-3.5-turbo", description: "Budget option - fast & cheap" },
];

const CLAUDE_MODELS: &[ModelInfo] = &[
    ModelInfo { name: "claude-3-5-sonnet-20241022", description: "Best Claude - excellent reasoning" },
    ModelInfo { name: "claude-3-5-haiku-20241022", description: "Fast Claude - quick responses" },
    ModelInfo { name: "claude-3-opus-20240229", description: "Most capable Claude - complex tasks" },
    ModelInfo { name: "claude-3-sonnet-20240229", description: "Balanced Claude - all-rounder" },
    ModelInfo { name: "claude-3-haiku-20240307", description: "Fastest Claude - simple tasks" },
];

pub fn models_for(provider: Provider) -> &'static [ModelInfo] {
    match provider {
        Provider::Google => GOOGLE_MODELS,
        Provider::OpenAI => OPENAI_MODELS,
        Provider::Claude => CLAUDE_MODELS,
    }
}

#[derive(Debug, Serialize)]
pub struct ProviderModels {
    pub provider: Provider,
    /// The first entry is the suggested default.
    pub models: &'static [ModelInfo],
}

pub fn catalog() -> Vec<ProviderModels> {
    Provider::ALL
        .into_iter()
        .map(|provider| ProviderModels {
            provider,
            models: models_for(provider),
        })
        .collect()
}
