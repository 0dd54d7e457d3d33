//! Envelope types exchanged with the browser.

use serde::{Deserialize, Serialize};

pub const REQ_ASSISTANT_CREATE: &str = "assistantCreate";
pub const REQ_UPLOAD: &str = "upload";
pub const REQ_CHAT: &str = "chat";

/// Raw inbound frame. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientEnvelope {
    #[serde(rename = "reqType", default)]
    pub req_type: String,
    #[serde(default)]
    pub payload: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub instruction: String,
}

impl ClientEnvelope {
    /// Route the envelope by its `reqType`.
    pub fn into_request(self) -> ClientRequest {
        match self.req_type.as_str() {
            REQ_ASSISTANT_CREATE => ClientRequest::AssistantCreate {
                name: self.name,
                instruction: self.instruction,
            },
            REQ_UPLOAD => ClientRequest::Upload {
                document: self.payload,
            },
            REQ_CHAT => ClientRequest::Chat {
                message: self.payload,
            },
            _ => ClientRequest::Unknown(self.req_type),
        }
    }
}

/// A routed client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientRequest {
    AssistantCreate { name: String, instruction: String },
    Upload { document: String },
    Chat { message: String },
    Unknown(String),
}

/// Parse a text frame into a request.
pub fn parse_frame(text: &str) -> Result<ClientRequest, serde_json::Error> {
    serde_json::from_str::<ClientEnvelope>(text).map(ClientEnvelope::into_request)
}

/// Outbound frame kind, serialized as the `reqType` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseKind {
    AssistantResponse,
    UploadRes,
    Chat,
    Error,
}

/// Outbound frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerResponse {
    #[serde(rename = "reqType")]
    pub kind: ResponseKind,
    pub payload: String,
}

impl ServerResponse {
    pub fn new(kind: ResponseKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    pub fn assistant_created(assistant_id: impl Into<String>) -> Self {
        Self::new(ResponseKind::AssistantResponse, assistant_id)
    }

    pub fn uploaded(attachment_id: impl Into<String>) -> Self {
        Self::new(ResponseKind::UploadRes, attachment_id)
    }

    pub fn chat(reply: impl Into<String>) -> Self {
        Self::new(ResponseKind::Chat, reply)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ResponseKind::Error, message)
    }

    pub fn to_json(&self) -> String {
        // Two string fields cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}
