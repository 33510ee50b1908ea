// Auxiliary helpers consulted by clients before generating answers:
// suggested models, rough cost estimates, and API key checks.
// None of these are used by the answer orchestrator.

pub mod cost;
pub mod handlers;
pub mod key_check;
pub mod models;
