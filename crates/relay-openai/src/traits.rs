//! Remote assistant API trait definition.

use async_trait::async_trait;

use crate::api::{
    Assistant, AssistantRequest, FileObject, FileUpload, MessageList, MessageRequest, Run,
    RunRequest, Thread, ThreadMessage, VectorStore, VectorStoreFile, VectorStoreRequest,
};
use crate::error::OpenAIError;

/// Operations the relay performs against the remote assistant service.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    async fn create_assistant(&self, request: &AssistantRequest) -> Result<Assistant, OpenAIError>;

    async fn modify_assistant(
        &self,
        assistant_id: &str,
        request: &AssistantRequest,
    ) -> Result<Assistant, OpenAIError>;

    async fn create_thread(&self) -> Result<Thread, OpenAIError>;

    async fn create_message(
        &self,
        thread_id: &str,
        request: &MessageRequest,
    ) -> Result<ThreadMessage, OpenAIError>;

    async fn create_run(&self, thread_id: &str, request: &RunRequest) -> Result<Run, OpenAIError>;

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, OpenAIError>;

    /// List messages on a thread, newest first, optionally only those produced by `run_id`.
    async fn list_messages(
        &self,
        thread_id: &str,
        run_id: Option<&str>,
    ) -> Result<MessageList, OpenAIError>;

    async fn upload_file(&self, upload: FileUpload) -> Result<FileObject, OpenAIError>;

    async fn create_vector_store(
        &self,
        request: &VectorStoreRequest,
    ) -> Result<VectorStore, OpenAIError>;

    async fn create_vector_store_file(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<VectorStoreFile, OpenAIError>;
}
