//! Assistant session state.
//!
//! A session holds the remote identifiers one logical conversation needs:
//! the assistant, its thread and the vector store backing document search.
//! The thread and vector store are created on first use and never replaced.

use std::future::Future;

use tokio::sync::{OnceCell, RwLock};

/// Remote identifiers for one logical conversation.
#[derive(Debug)]
pub struct AssistantSession {
    id: String,
    assistant_id: RwLock<Option<String>>,
    thread_id: OnceCell<String>,
    vector_store_id: OnceCell<String>,
}

impl AssistantSession {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            assistant_id: RwLock::new(None),
            thread_id: OnceCell::new(),
            vector_store_id: OnceCell::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn assistant_id(&self) -> Option<String> {
        self.assistant_id.read().await.clone()
    }

    /// Store a new assistant id, returning the one it replaces.
    pub async fn set_assistant_id(&self, assistant_id: String) -> Option<String> {
        self.assistant_id.write().await.replace(assistant_id)
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.get().map(String::as_str)
    }

    pub fn vector_store_id(&self) -> Option<&str> {
        self.vector_store_id.get().map(String::as_str)
    }

    /// Return the thread id, running `create` only if none exists yet.
    ///
    /// Concurrent callers wait for the first creation instead of racing it.
    /// A failed creation leaves the slot empty for the next caller.
    pub async fn get_or_create_thread<F, Fut, E>(&self, create: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        self.thread_id.get_or_try_init(create).await.cloned()
    }

    /// Return the vector store id, running `create` only if none exists yet.
    pub async fn get_or_create_vector_store<F, Fut, E>(&self, create: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        self.vector_store_id.get_or_try_init(create).await.cloned()
    }
}

impl Default for AssistantSession {
    fn default() -> Self {
        Self::new()
    }
}
