// Interview answer generation.
// Implements: company-context assembly, prompt construction, per-question generation.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
