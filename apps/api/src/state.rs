use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::{Provider, ProviderAdapter, ProviderConfig};

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable provider backend. Default: `HttpProviderAdapter`.
    pub adapter: Arc<dyn ProviderAdapter>,
}

impl AppState {
    /// Builds a [`ProviderConfig`] from request fields, falling back to the
    /// server-side key when the request carries none.
    ///
    /// An unknown provider name is passed through untouched; resolution
    /// reports it.
    pub fn provider_config(
        &self,
        provider: String,
        model: String,
        api_key: Option<String>,
    ) -> ProviderConfig {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                provider
                    .parse::<Provider>()
                    .ok()
                    .and_then(|p| self.config.api_keys.for_provider(p))
                    .map(str::to_string)
            })
            .unwrap_or_default();

        ProviderConfig::new(provider, model, api_key)
    }
}
