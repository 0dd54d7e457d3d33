//! OpenAI Assistants API client.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::api::{
    Assistant, AssistantRequest, ErrorBody, FileObject, FileUpload, MessageList, MessageRequest,
    Run, RunRequest, Thread, ThreadMessage, VectorStore, VectorStoreFile, VectorStoreFileRequest,
    VectorStoreRequest,
};
use crate::error::OpenAIError;
use crate::traits::AssistantApi;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

const BETA_HEADER: &str = "OpenAI-Beta";
const BETA_ASSISTANTS_V2: &str = "assistants=v2";

/// Assistants API client.
pub struct OpenAIAssistantClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAIAssistantClient {
    pub fn new(api_key: String) -> Self {
        Self::with_url(api_key, DEFAULT_API_URL.to_string())
    }

    /// Create client with custom base URL (for OpenAI-compatible APIs and tests).
    pub fn with_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create client with a per-request timeout.
    pub fn with_timeout(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, OpenAIError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(&self.api_key)
            .header(BETA_HEADER, BETA_ASSISTANTS_V2)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, OpenAIError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!("POST {}", path);
        let response = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, OpenAIError> {
        debug!("GET {}", path);
        let response = self
            .request(reqwest::Method::GET, path)
            .query(query)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, OpenAIError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => body.error.message,
                Err(_) => text,
            };
            error!("Assistants API returned {}: {}", status.as_u16(), message);
            return Err(OpenAIError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| OpenAIError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AssistantApi for OpenAIAssistantClient {
    async fn create_assistant(&self, request: &AssistantRequest) -> Result<Assistant, OpenAIError> {
        self.post_json("assistants", request).await
    }

    async fn modify_assistant(
        &self,
        assistant_id: &str,
        request: &AssistantRequest,
    ) -> Result<Assistant, OpenAIError> {
        self.post_json(&format!("assistants/{}", assistant_id), request)
            .await
    }

    async fn create_thread(&self) -> Result<Thread, OpenAIError> {
        self.post_json("threads", &serde_json::json!({})).await
    }

    async fn create_message(
        &self,
        thread_id: &str,
        request: &MessageRequest,
    ) -> Result<ThreadMessage, OpenAIError> {
        self.post_json(&format!("threads/{}/messages", thread_id), request)
            .await
    }

    async fn create_run(&self, thread_id: &str, request: &RunRequest) -> Result<Run, OpenAIError> {
        self.post_json(&format!("threads/{}/runs", thread_id), request)
            .await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, OpenAIError> {
        self.get_json(&format!("threads/{}/runs/{}", thread_id, run_id), &[])
            .await
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        run_id: Option<&str>,
    ) -> Result<MessageList, OpenAIError> {
        let path = format!("threads/{}/messages", thread_id);
        match run_id {
            Some(run_id) => self.get_json(&path, &[("run_id", run_id)]).await,
            None => self.get_json(&path, &[]).await,
        }
    }

    async fn upload_file(&self, upload: FileUpload) -> Result<FileObject, OpenAIError> {
        debug!("POST files ({} bytes)", upload.bytes.len());
        let part = reqwest::multipart::Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = reqwest::multipart::Form::new()
            .text("purpose", upload.purpose)
            .part("file", part);

        let response = self
            .request(reqwest::Method::POST, "files")
            .multipart(form)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn create_vector_store(
        &self,
        request: &VectorStoreRequest,
    ) -> Result<VectorStore, OpenAIError> {
        self.post_json("vector_stores", request).await
    }

    async fn create_vector_store_file(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<VectorStoreFile, OpenAIError> {
        let request = VectorStoreFileRequest {
            file_id: file_id.to_string(),
        };
        self.post_json(&format!("vector_stores/{}/files", vector_store_id), &request)
            .await
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
