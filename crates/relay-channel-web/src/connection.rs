//! WebSocket connection handling.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::message::{parse_frame, ClientRequest, ServerResponse};
use crate::RelayState;

/// Serve one client connection until it closes.
///
/// The reader only parses frames. Requests run one at a time, in arrival
/// order, on a worker task, and replies go out through a writer task. The
/// request queue is unbounded so the reader always sees a close. When the
/// reader stops, the connection's cancellation token aborts any run the
/// worker is still waiting on and drops requests still queued.
pub(crate) async fn handle_connection(socket: WebSocket, state: Arc<RelayState>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    let session = state.session_for_connection();
    let cancel = state.shutdown.child_token();
    state.connections.insert(conn_id.clone(), cancel.clone());

    info!("WebSocket connection established: {} (session {})", conn_id, session.id());

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<ServerResponse>(32);
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ClientRequest>();

    let writer_id = conn_id.clone();
    let writer = tokio::spawn(async move {
        while let Some(response) = outbound_rx.recv().await {
            if let Err(e) = ws_tx.send(Message::Text(response.to_json().into())).await {
                warn!("Failed to send message to {}: {}", writer_id, e);
                break;
            }
        }
    });

    let worker_state = state.clone();
    let worker_cancel = cancel.clone();
    let worker_tx = outbound_tx.clone();
    let worker = tokio::spawn(async move {
        while let Some(request) = request_rx.recv().await {
            if worker_cancel.is_cancelled() {
                debug!("Dropping {} queued request(s) for closed connection", request_rx.len() + 1);
                break;
            }
            let response = worker_state
                .handler
                .handle(request, &session, &worker_cancel)
                .await;
            if let Some(response) = response {
                if worker_tx.send(response).await.is_err() {
                    break;
                }
            }
        }
    });

    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Shutdown requested, closing {}", conn_id);
                break;
            }
            frame = ws_rx.next() => frame,
        };

        match frame {
            Some(Ok(Message::Text(text))) => {
                debug!("recv from {}: {}", conn_id, text.as_str());
                match parse_frame(text.as_str()) {
                    Ok(request) => {
                        if request_tx.send(request).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to parse frame from {}: {}", conn_id, e);
                        if state.report_parse_errors {
                            let reply = ServerResponse::error(format!("invalid request: {}", e));
                            if outbound_tx.try_send(reply).is_err() {
                                warn!("Outbound queue full for {}, dropping parse error", conn_id);
                            }
                        }
                    }
                }
            }
            Some(Ok(Message::Close(_))) => {
                info!("WebSocket closed by client: {}", conn_id);
                break;
            }
            Some(Ok(_)) => {
                debug!("Ignoring non-text frame from {}", conn_id);
            }
            Some(Err(e)) => {
                error!("WebSocket error from {}: {}", conn_id, e);
                break;
            }
            None => {
                info!("WebSocket connection ended: {}", conn_id);
                break;
            }
        }
    }

    cancel.cancel();
    drop(request_tx);
    drop(outbound_tx);
    // The peer is gone, so pending replies are dropped with the writer.
    writer.abort();
    if let Err(e) = worker.await {
        error!("Request worker for {} panicked: {}", conn_id, e);
    }

    state.connections.remove(&conn_id);
    debug!("WebSocket connection removed: {}", conn_id);
}
