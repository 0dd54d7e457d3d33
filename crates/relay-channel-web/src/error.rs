//! Relay error types.
//!
//! The `Display` text of each variant is the payload sent back to the browser.

use relay_openai::api::RunStatus;
use relay_openai::OpenAIError;
use thiserror::Error;

use crate::message::ServerResponse;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Upload or chat was requested before any assistant exists.
    #[error("Assistant is not created")]
    AssistantNotCreated,

    /// A remote API call failed.
    #[error("{0}")]
    Remote(#[from] OpenAIError),

    /// The run ended in a non-success terminal state.
    #[error("failed")]
    RunFailed {
        status: RunStatus,
        reason: Option<String>,
    },

    /// The run completed without a text reply.
    #[error("invalid response")]
    InvalidResponse,

    /// The run did not finish before the poll deadline.
    #[error("timeout")]
    Timeout,

    /// The originating connection went away while the request was in flight.
    #[error("connection closed")]
    Cancelled,

    #[error("Server error: {0}")]
    Server(String),
}

impl RelayError {
    /// Envelope to send for this error, if the client can still receive one.
    pub fn to_response(&self) -> Option<ServerResponse> {
        match self {
            Self::Cancelled => None,
            other => Some(ServerResponse::error(other.to_string())),
        }
    }
}
