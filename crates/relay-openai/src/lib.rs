//! OpenAI Assistants API client for assistant-relay.
//!
//! Covers the slice of the Assistants v2 API the relay needs: assistants,
//! threads, messages, runs, files and vector stores.

pub mod api;
mod client;
mod error;
mod traits;

pub use client::{OpenAIAssistantClient, DEFAULT_API_URL};
pub use error::OpenAIError;
pub use traits::AssistantApi;
