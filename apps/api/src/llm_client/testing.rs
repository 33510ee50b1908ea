//! Scripted [`ProviderAdapter`] for unit tests. Never talks to the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{Completion, CompletionOptions, LlmError, ProviderAdapter, ProviderConfig};

type ErrorFn = fn() -> LlmError;

pub(crate) fn server_error() -> LlmError {
    LlmError::Api {
        status: 500,
        message: "upstream exploded".to_string(),
    }
}

/// Replies `"reply N"` (N = 1-based call number) unless configured otherwise.
#[derive(Default)]
pub(crate) struct FakeAdapter {
    pub resolve_calls: AtomicUsize,
    pub complete_calls: Arc<AtomicUsize>,
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub options: Mutex<Vec<CompletionOptions>>,
    resolve_error: Option<ErrorFn>,
    fail_marker: Option<(&'static str, ErrorFn)>,
    reply: Option<&'static str>,
}

impl FakeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolution itself fails with the given error.
    pub fn rejecting(mut self, error: ErrorFn) -> Self {
        self.resolve_error = Some(error);
        self
    }

    /// Calls whose prompt contains `marker` fail with the given error.
    pub fn failing_on(mut self, marker: &'static str, error: ErrorFn) -> Self {
        self.fail_marker = Some((marker, error));
        self
    }

    /// Every call fails with the given error.
    pub fn failing_all(self, error: ErrorFn) -> Self {
        self.failing_on("", error)
    }

    /// Every successful call returns this text.
    pub fn replying(mut self, reply: &'static str) -> Self {
        self.reply = Some(reply);
        self
    }

    pub fn resolve_count(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn complete_count(&self) -> usize {
        self.complete_calls.load(Ordering::SeqCst)
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn recorded_options(&self) -> Vec<CompletionOptions> {
        self.options.lock().unwrap().clone()
    }
}

impl ProviderAdapter for FakeAdapter {
    fn resolve(
        &self,
        config: &ProviderConfig,
        options: CompletionOptions,
    ) -> Result<Box<dyn Completion>, LlmError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.options.lock().unwrap().push(options);

        if let Some(error) = self.resolve_error {
            return Err(error());
        }
        // Keep the real adapter's provider validation.
        config.provider.parse::<super::Provider>()?;

        Ok(Box::new(FakeCompletion {
            calls: Arc::clone(&self.complete_calls),
            prompts: Arc::clone(&self.prompts),
            fail_marker: self.fail_marker,
            reply: self.reply,
        }))
    }
}

struct FakeCompletion {
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
    fail_marker: Option<(&'static str, ErrorFn)>,
    reply: Option<&'static str>,
}

#[async_trait]
impl Completion for FakeCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some((marker, error)) = self.fail_marker {
            if prompt.contains(marker) {
                return Err(error());
            }
        }

        Ok(match self.reply {
            Some(reply) => reply.to_string(),
            None => format!("reply {n}"),
        })
    }
}
