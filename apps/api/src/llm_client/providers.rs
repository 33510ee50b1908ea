//! Wire formats for the three supported providers.
//!
//! Each `*Completion` wraps a [`Target`] and issues a single request per call.
//! All three APIs report failures with the same `{"error": {"message": ...}}`
//! envelope, so error handling is shared in [`send`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Completion, CompletionOptions, LlmError, Provider};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Everything a completion needs to reach its provider.
#[derive(Clone)]
pub struct Target {
    pub client: Client,
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub options: CompletionOptions,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Sends the request and decodes a successful body as `T`.
/// Non-2xx responses become [`LlmError::Api`].
async fn send<T: DeserializeOwned>(request: RequestBuilder, provider: Provider) -> Result<T, LlmError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        warn!("{} API returned {}: {}", provider, status, message);
        return Err(LlmError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Rejects a missing or zero-length completion; whitespace is passed through as-is.
fn non_empty(text: Option<String>) -> Result<String, LlmError> {
    match text {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(LlmError::EmptyContent),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Google (Gemini generateContent)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    text: Option<String>,
}

impl GeminiResponse {
    /// Concatenates the text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        Some(text)
    }
}

pub struct GeminiCompletion(pub Target);

#[async_trait]
impl Completion for GeminiCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let target = &self.0;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            target.base_url, target.model
        );
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: target.options.temperature,
                max_output_tokens: target.options.max_tokens,
            },
        };

        let request = target
            .client
            .post(url)
            .header("x-goog-api-key", &target.api_key)
            .json(&body);
        let response: GeminiResponse = send(request, Provider::Google).await?;

        non_empty(response.text())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI (chat completions)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

pub struct OpenAiCompletion(pub Target);

#[async_trait]
impl Completion for OpenAiCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let target = &self.0;
        let body = ChatRequest {
            model: &target.model,
            temperature: target.options.temperature,
            max_tokens: target.options.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let request = target
            .client
            .post(format!("{}/v1/chat/completions", target.base_url))
            .bearer_auth(&target.api_key)
            .json(&body);
        let response: ChatResponse = send(request, Provider::OpenAI).await?;

        if let Some(usage) = &response.usage {
            debug!(
                "OpenAI call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        non_empty(
            response
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content),
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Claude (Anthropic messages)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicResponse {
    /// Extracts the text content from the first text block.
    fn text(self) -> Option<String> {
        self.content
            .into_iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text)
    }
}

pub struct ClaudeCompletion(pub Target);

#[async_trait]
impl Completion for ClaudeCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let target = &self.0;
        let body = AnthropicRequest {
            model: &target.model,
            max_tokens: target.options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: target.options.temperature,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let request = target
            .client
            .post(format!("{}/v1/messages", target.base_url))
            .header("x-api-key", &target.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body);
        let response: AnthropicResponse = send(request, Provider::Claude).await?;

        if let Some(usage) = &response.usage {
            debug!(
                "Claude call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        non_empty(response.text())
    }
}
