//! Rough cost estimates for a generation run.
//!
//! Token counts are heuristics (résumé characters → tokens, a flat 50 tokens
//! per question, 1.3 tokens per answer word) and prices are static
//! per-million-token list prices. Treat the result as an order of magnitude.

use std::fmt;

use serde::Serialize;

use crate::llm_client::Provider;

const TOKENS_PER_QUESTION: f64 = 50.0;
const TOKENS_PER_ANSWER_WORD: f64 = 1.3;
const ONE_CENT: f64 = 0.01;

/// USD per 1M tokens: (provider, model, input, output).
const PRICING: &[(Provider, &str, f64, f64)] = &[
    (Provider::Google, "gemini-2.0-flash-exp", 0.075, 0.30),
    (Provider::Google, "gemini-1.5-pro-latest", 3.50, 10.50),
    (Provider::Google, "gemini-1.5-pro", 3.50, 10.50),
    (Provider::Google, "gemini-1.5-flash", 0.075, 0.30),
    (Provider::Google, "gemini-1.5-flash-8b", 0.0375, 0.15),
    (Provider::OpenAI, "gpt-4o", 2.50, 10.00),
    (Provider::OpenAI, "gpt-4o-mini", 0.15, 0.60),
    (Provider::OpenAI, "gpt-4-turbo", 10.00, 30.00),
    (Provider::OpenAI, "gpt-4", 30.00, 60.00),
    (Provider::OpenAI, "gpt-3.5-turbo", 0.50, 1.50),
    (Provider::Claude, "claude-3-5-sonnet-20241022", 3.00, 15.00),
    (Provider::Claude, "claude-3-5-haiku-20241022", 0.25, 1.25),
    (Provider::Claude, "claude-3-opus-20240229", 15.00, 75.00),
    (Provider::Claude, "claude-3-sonnet-20240229", 3.00, 15.00),
    (Provider::Claude, "claude-3-haiku-20240307", 0.25, 1.25),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CostEstimate {
    /// No price is known for this provider/model.
    Unavailable,
    BelowOneCent,
    Approximately(f64),
}

impl CostEstimate {
    pub fn usd(&self) -> Option<f64> {
        match self {
            CostEstimate::Approximately(usd) => Some(*usd),
            _ => None,
        }
    }
}

impl fmt::Display for CostEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostEstimate::Unavailable => f.write_str("Cost estimation not available"),
            CostEstimate::BelowOneCent => f.write_str("< $0.01"),
            CostEstimate::Approximately(usd) => write!(f, "~${usd:.3}"),
        }
    }
}

impl Serialize for CostEstimate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn price_for(provider: Provider, model: &str) -> Option<(f64, f64)> {
    PRICING
        .iter()
        .find(|(p, m, _, _)| *p == provider && *m == model)
        .map(|(_, _, input, output)| (*input, *output))
}

pub fn estimate_cost(
    provider: &str,
    model: &str,
    resume_chars: usize,
    num_questions: usize,
    word_limit: u32,
) -> CostEstimate {
    let Some((input_price, output_price)) = provider
        .parse::<Provider>()
        .ok()
        .and_then(|p| price_for(p, model.trim()))
    else {
        return CostEstimate::Unavailable;
    };

    let resume_tokens = (resume_chars / 4 * 5) as f64;
    let question_tokens = num_questions as f64 * TOKENS_PER_QUESTION;
    let answer_tokens = num_questions as f64 * f64::from(word_limit) * TOKENS_PER_ANSWER_WORD;

    let input_cost = (resume_tokens + question_tokens) / 1_000_000.0 * input_price;
    let output_cost = answer_tokens / 1_000_000.0 * output_price;
    let total = input_cost + output_cost;

    if total < ONE_CENT {
        CostEstimate::BelowOneCent
    } else {
        CostEstimate::Approximately(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_for_known_model() {
        // 5000 résumé + 250 question tokens in, 1300 answer tokens out.
        let estimate = estimate_cost("OpenAI", "gpt-4o", 4000, 5, 200);
        let usd = estimate.usd().unwrap();
        assert!((usd - 0.026125).abs() < 1e-9);
        assert_eq!(estimate.to_string(), "~$0.026");
    }

    #[test]
    fn test_cheap_model_rounds_below_one_cent() {
        let estimate = estimate_cost("google", "gemini-1.5-flash", 4000, 5, 200);
        assert_eq!(estimate, CostEstimate::BelowOneCent);
        assert_eq!(estimate.to_string(), "< $0.01");
    }

    #[test]
    fn test_unknown_model_or_provider_is_unavailable() {
        assert_eq!(
            estimate_cost("Claude", "claude-unknown", 1000, 1, 100),
            CostEstimate::Unavailable
        );
        assert_eq!(
            estimate_cost("Mistral", "gpt-4o", 1000, 1, 100),
            CostEstimate::Unavailable
        );
        assert_eq!(
            CostEstimate::Unavailable.to_string(),
            "Cost estimation not available"
        );
    }

    #[test]
    fn test_resume_tokens_use_integer_division() {
        // 7 chars → 7 / 4 * 5 = 5 tokens; tiny but exercises the path.
        let a = estimate_cost("OpenAI", "gpt-4", 7, 100, 500);
        let b = estimate_cost("OpenAI", "gpt-4", 4, 100, 500);
        assert_eq!(a, b);
    }

    #[test]
    fn test_serializes_as_display_text() {
        let value = serde_json::to_value(CostEstimate::BelowOneCent).unwrap();
        assert_eq!(value, serde_json::json!("< $0.01"));
    }
}
