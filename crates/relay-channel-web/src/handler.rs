//! Request handling: create-assistant, upload and chat.

use std::sync::Arc;
use std::time::Duration;

use relay_config::Config;
use relay_openai::api::{
    AssistantRequest, FileUpload, MessageRequest, RunRequest, VectorStoreRequest,
};
use relay_openai::AssistantApi;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::RelayError;
use crate::message::{ClientRequest, ServerResponse};
use crate::poller::{RunOutcome, RunPoller};
use crate::session::AssistantSession;

/// File name given to uploaded documents.
pub const UPLOAD_FILE_NAME: &str = "data.txt";

/// Settings that shape remote calls.
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    pub model: String,
    pub vector_store_name: String,
    pub poll_interval: Duration,
    /// `None` polls until the run is terminal.
    pub poll_timeout: Option<Duration>,
}

impl HandlerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.openai.model.clone(),
            vector_store_name: config.openai.vector_store_name.clone(),
            poll_interval: Duration::from_millis(config.poll.interval_ms),
            poll_timeout: match config.poll.timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Executes client requests against the remote assistant API.
pub struct RequestHandler {
    api: Arc<dyn AssistantApi>,
    settings: HandlerSettings,
    poller: RunPoller,
}

impl RequestHandler {
    pub fn new(api: Arc<dyn AssistantApi>, settings: HandlerSettings) -> Self {
        let poller = RunPoller::new(settings.poll_interval, settings.poll_timeout);
        Self {
            api,
            settings,
            poller,
        }
    }

    pub fn settings(&self) -> &HandlerSettings {
        &self.settings
    }

    /// Handle one request and build the reply, if any.
    ///
    /// Unknown request types and requests abandoned by a closed connection produce no reply.
    pub async fn handle(
        &self,
        request: ClientRequest,
        session: &AssistantSession,
        cancel: &CancellationToken,
    ) -> Option<ServerResponse> {
        let result = match request {
            ClientRequest::AssistantCreate { name, instruction } => self
                .create_assistant(session, &name, &instruction)
                .await
                .map(ServerResponse::assistant_created),
            ClientRequest::Upload { document } => self
                .upload(session, document)
                .await
                .map(ServerResponse::uploaded),
            ClientRequest::Chat { message } => self
                .chat(session, &message, cancel)
                .await
                .map(ServerResponse::chat),
            ClientRequest::Unknown(req_type) => {
                debug!("Ignoring unknown request type '{}'", req_type);
                return None;
            }
        };

        match result {
            Ok(response) => Some(response),
            Err(e) => {
                error!("Request failed in session {}: {}", session.id(), e);
                e.to_response()
            }
        }
    }

    /// Create a document-search assistant and make it the session's assistant.
    pub async fn create_assistant(
        &self,
        session: &AssistantSession,
        name: &str,
        instruction: &str,
    ) -> Result<String, RelayError> {
        let request = AssistantRequest::with_file_search(&self.settings.model, name, instruction);
        let assistant = self.api.create_assistant(&request).await?;

        if let Some(previous) = session.set_assistant_id(assistant.id.clone()).await {
            info!("Assistant {} replaces {}", assistant.id, previous);
        } else {
            info!("Assistant {} created", assistant.id);
        }
        Ok(assistant.id)
    }

    /// Index a document for the session's assistant.
    ///
    /// Returns the id of the file attached to the vector store. Steps that
    /// succeeded before a failure are not undone.
    pub async fn upload(
        &self,
        session: &AssistantSession,
        document: String,
    ) -> Result<String, RelayError> {
        let assistant_id = session
            .assistant_id()
            .await
            .ok_or(RelayError::AssistantNotCreated)?;

        let vector_store_id = session
            .get_or_create_vector_store(|| async {
                let request = VectorStoreRequest {
                    name: self.settings.vector_store_name.clone(),
                };
                let store = self.api.create_vector_store(&request).await?;
                info!("Vector store {} created", store.id);
                Ok::<_, RelayError>(store.id)
            })
            .await?;

        let file = self
            .api
            .upload_file(FileUpload::for_assistants(UPLOAD_FILE_NAME, document))
            .await?;
        debug!("Uploaded file {} ({} bytes)", file.id, file.bytes);

        let attached = self
            .api
            .create_vector_store_file(&vector_store_id, &file.id)
            .await?;

        self.api
            .modify_assistant(
                &assistant_id,
                &AssistantRequest::attach_vector_stores(vec![vector_store_id.clone()]),
            )
            .await?;

        info!("File {} indexed in vector store {}", attached.id, vector_store_id);
        Ok(attached.id)
    }

    /// Send a user message and wait for the assistant's reply.
    pub async fn chat(
        &self,
        session: &AssistantSession,
        message: &str,
        cancel: &CancellationToken,
    ) -> Result<String, RelayError> {
        let assistant_id = session
            .assistant_id()
            .await
            .ok_or(RelayError::AssistantNotCreated)?;

        let thread_id = session
            .get_or_create_thread(|| async {
                let thread = self.api.create_thread().await?;
                info!("Thread {} created", thread.id);
                Ok::<_, RelayError>(thread.id)
            })
            .await?;

        self.api
            .create_message(&thread_id, &MessageRequest::user(message))
            .await?;

        let run = self
            .api
            .create_run(
                &thread_id,
                &RunRequest {
                    assistant_id,
                    model: Some(self.settings.model.clone()),
                },
            )
            .await?;
        debug!("Run {} started on thread {}", run.id, thread_id);

        match self
            .poller
            .wait(self.api.as_ref(), &thread_id, &run.id, cancel)
            .await?
        {
            RunOutcome::Completed(run) => {
                let messages = self.api.list_messages(&thread_id, Some(&run.id)).await?;
                messages
                    .data
                    .first()
                    .and_then(|m| m.first_text())
                    .map(str::to_string)
                    .ok_or(RelayError::InvalidResponse)
            }
            RunOutcome::Failed(run) => Err(RelayError::RunFailed {
                status: run.status,
                reason: run.last_error.map(|e| e.message),
            }),
            RunOutcome::TimedOut => Err(RelayError::Timeout),
            RunOutcome::Cancelled => Err(RelayError::Cancelled),
        }
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
