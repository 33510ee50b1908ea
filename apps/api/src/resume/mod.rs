// Résumé intake: file extraction and optional LLM clean-up.

pub mod extract;
pub mod handlers;
pub mod normalize;
pub mod prompts;
