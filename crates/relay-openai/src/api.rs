//! Assistants API wire types.
//! Response structs keep a few fields the relay never reads so logs and tests can inspect them.

use serde::{Deserialize, Serialize};

/// Tool type enabling document search over attached vector stores.
pub const TOOL_FILE_SEARCH: &str = "file_search";

/// File purpose for documents used by assistants.
pub const PURPOSE_ASSISTANTS: &str = "assistants";

/// Create or modify assistant request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssistantRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<AssistantTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,
}

impl AssistantRequest {
    /// Request for a new assistant with document search enabled.
    pub fn with_file_search(
        model: impl Into<String>,
        name: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            model: Some(model.into()),
            name: Some(name.into()),
            instructions: Some(instructions.into()),
            tools: vec![AssistantTool::file_search()],
            tool_resources: None,
        }
    }

    /// Request that points the assistant's document search at the given vector stores.
    pub fn attach_vector_stores(vector_store_ids: Vec<String>) -> Self {
        Self {
            tool_resources: Some(ToolResources {
                file_search: Some(FileSearchResources { vector_store_ids }),
            }),
            ..Default::default()
        }
    }
}

/// Tool enabled on an assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantTool {
    #[serde(rename = "type")]
    pub tool_type: String,
}

impl AssistantTool {
    pub fn file_search() -> Self {
        Self {
            tool_type: TOOL_FILE_SEARCH.to_string(),
        }
    }
}

/// Resources used by an assistant's tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolResources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_search: Option<FileSearchResources>,
}

/// Vector stores searched by the `file_search` tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSearchResources {
    #[serde(default)]
    pub vector_store_ids: Vec<String>,
}

/// Assistant object.
#[derive(Debug, Clone, Deserialize)]
pub struct Assistant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub tools: Vec<AssistantTool>,
}

/// Thread object.
#[derive(Debug, Clone, Deserialize)]
pub struct Thread {
    pub id: String,
}

/// Create message request.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest {
    pub role: String,
    pub content: String,
}

impl MessageRequest {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Message stored on a thread.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub content: Vec<MessageContent>,
    #[serde(default)]
    pub run_id: Option<String>,
}

impl ThreadMessage {
    /// Text of the first content block, if it is a text block.
    pub fn first_text(&self) -> Option<&str> {
        match self.content.first()? {
            MessageContent::Text { text } => Some(text.value.as_str()),
            MessageContent::Unsupported => None,
        }
    }
}

/// Content block of a message.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    #[serde(other)]
    Unsupported,
}

/// Text content with annotations.
#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub value: String,
    #[serde(default)]
    pub annotations: Vec<serde_json::Value>,
}

/// Paginated message list.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub data: Vec<ThreadMessage>,
    #[serde(default)]
    pub has_more: bool,
}

/// Create run request.
#[derive(Debug, Clone, Serialize)]
pub struct RunRequest {
    pub assistant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Run object.
#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub assistant_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

/// Run lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Whether the run can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Cancelled | Self::Failed | Self::Incomplete | Self::Expired
        )
    }
}

/// Error recorded on a failed run.
#[derive(Debug, Clone, Deserialize)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

/// Uploaded file object.
#[derive(Debug, Clone, Deserialize)]
pub struct FileObject {
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub bytes: u64,
}

/// File to upload as a multipart form.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub purpose: String,
}

impl FileUpload {
    /// Document for assistant file search.
    pub fn for_assistants(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            purpose: PURPOSE_ASSISTANTS.to_string(),
        }
    }
}

/// Create vector store request.
#[derive(Debug, Clone, Serialize)]
pub struct VectorStoreRequest {
    pub name: String,
}

/// Vector store object.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorStore {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Attach file to vector store request.
#[derive(Debug, Clone, Serialize)]
pub struct VectorStoreFileRequest {
    pub file_id: String,
}

/// File attached to a vector store.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorStoreFile {
    pub id: String,
    #[serde(default)]
    pub vector_store_id: String,
    #[serde(default)]
    pub status: String,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
