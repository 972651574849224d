//! Narrative generation: prompt composition, the chat-completion
//! client, and the orchestrator tying geocoding and inference into
//! one request cycle.

mod client;
mod error;
mod generator;
mod prompt;
mod types;

pub use client::InferenceClient;
pub use error::InferenceError;
pub use generator::{NarrativeGenerator, FETCH_FAILED};
pub use prompt::compose_prompt;
