//! `OpenAI` chat completions client.
//!
//! Non-streaming access to the chat completions API, used for the customer
//! analysis and treatment-plan generation endpoints.

mod client;
mod error;
mod types;

pub use client::{OpenAiClient, extract_json};
pub use error::OpenAiError;
pub use types::ChatMessage;
