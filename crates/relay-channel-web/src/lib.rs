//! # Relay Channel - Web
//!
//! WebSocket channel relaying browser requests to the Assistants API.
//!
//! This channel:
//! - Serves a small HTML/JS UI embedded in the binary
//! - Accepts WebSocket connections at `/ws/assistant`
//! - Turns `assistantCreate`, `upload` and `chat` envelopes into remote API
//!   calls and sends the result back on the same connection
//!
//! ## Usage
//!
//! ```ignore
//! use relay_channel_web::{WebRelay, WebRelayConfig};
//!
//! let relay = WebRelay::new(WebRelayConfig::from_config(&config), api);
//! let addr = relay.start().await?;
//! ```

mod connection;
mod error;
mod handler;
mod message;
mod poller;
mod server;
mod session;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use relay_config::{Config, SessionScope};
use relay_openai::AssistantApi;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub use error::RelayError;
pub use handler::{HandlerSettings, RequestHandler, UPLOAD_FILE_NAME};
pub use message::{parse_frame, ClientEnvelope, ClientRequest, ResponseKind, ServerResponse};
pub use poller::{RunOutcome, RunPoller};
pub use server::{create_router, WS_PATH};
pub use session::AssistantSession;

/// Web relay configuration.
#[derive(Debug, Clone)]
pub struct WebRelayConfig {
    pub host: String,
    pub port: u16,
    pub session_scope: SessionScope,
    pub report_parse_errors: bool,
    pub handler: HandlerSettings,
}

impl WebRelayConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            session_scope: config.channel.session_scope,
            report_parse_errors: config.channel.report_parse_errors,
            handler: HandlerSettings::from_config(config),
        }
    }
}

impl Default for WebRelayConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Relay state shared across handlers.
pub struct RelayState {
    /// Executes client requests.
    pub handler: RequestHandler,
    /// Session used by every connection when the scope is shared.
    pub shared_session: Arc<AssistantSession>,
    pub session_scope: SessionScope,
    pub report_parse_errors: bool,
    /// Active connections, keyed by connection id.
    pub connections: DashMap<String, CancellationToken>,
    /// Parent of every connection's cancellation token.
    pub shutdown: CancellationToken,
    pub started: AtomicBool,
}

impl RelayState {
    pub fn new(api: Arc<dyn AssistantApi>, config: &WebRelayConfig) -> Self {
        Self {
            handler: RequestHandler::new(api, config.handler.clone()),
            shared_session: Arc::new(AssistantSession::new()),
            session_scope: config.session_scope,
            report_parse_errors: config.report_parse_errors,
            connections: DashMap::new(),
            shutdown: CancellationToken::new(),
            started: AtomicBool::new(false),
        }
    }

    /// Session a new connection should use.
    pub fn session_for_connection(&self) -> Arc<AssistantSession> {
        match self.session_scope {
            SessionScope::Shared => self.shared_session.clone(),
            SessionScope::PerConnection => Arc::new(AssistantSession::new()),
        }
    }
}

/// HTTP/WebSocket relay server.
pub struct WebRelay {
    config: WebRelayConfig,
    state: Arc<RelayState>,
}

impl WebRelay {
    pub fn new(config: WebRelayConfig, api: Arc<dyn AssistantApi>) -> Self {
        let state = Arc::new(RelayState::new(api, &config));
        Self { config, state }
    }

    /// Get the configured listen address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Get a reference to the shared state.
    pub fn state(&self) -> Arc<RelayState> {
        self.state.clone()
    }

    pub fn is_started(&self) -> bool {
        self.state.started.load(Ordering::SeqCst)
    }

    pub fn connection_count(&self) -> usize {
        self.state.connections.len()
    }

    /// Bind the listener and serve in a background task.
    ///
    /// Returns the bound address, which differs from the configured one when port is 0.
    pub async fn start(&self) -> Result<SocketAddr, RelayError> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| RelayError::Server(format!("Invalid address: {}", e)))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| RelayError::Server(format!("Failed to bind: {}", e)))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| RelayError::Server(e.to_string()))?;

        let router = create_router(self.state.clone());
        let shutdown = self.state.shutdown.clone();

        info!("Relay listening on http://{}", local_addr);
        self.state.started.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await
            {
                tracing::error!("Relay server error: {}", e);
            }
        });

        Ok(local_addr)
    }

    /// Stop accepting connections and cancel in-flight requests.
    pub fn stop(&self) {
        if !self.is_started() {
            return;
        }
        self.state.started.store(false, Ordering::SeqCst);
        self.state.shutdown.cancel();
        debug!("Relay stopped");
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
