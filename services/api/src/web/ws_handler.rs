//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a timer WebSocket connection.
//! Each connection runs at most one timer at a time.

use crate::web::{
    protocol::{ClientMessage, ServerMessage},
    state::{AppState, CurrentSession, TimerConnection},
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    Extension,
};
use futures::{SinkExt, StreamExt};
use mh_toolkit_core::timer::TimerKind;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Outgoing messages buffered per connection.
const OUTBOUND_BUFFER: usize = 64;

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn timer_ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentSession(session_id)): Extension<CurrentSession>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state, session_id))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>, session_id: Uuid) {
    info!("Timer connection opened for session {}", session_id);

    // --- 1. Writer: forwards queued server messages to the socket ---
    let (mut ws_sender, mut receiver) = socket.split();
    let (sender, mut outbound) = mpsc::channel::<ServerMessage>(OUTBOUND_BUFFER);
    let writer = tokio::spawn(async move {
        while let Some(msg) = outbound.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize server message: {:?}", e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                warn!("Failed to send timer message; client is gone.");
                break;
            }
        }
    });

    // --- 2. Main Message Loop ---
    let mut timers = TimerConnection::new();
    loop {
        match receiver.next().await {
            Some(Ok(Message::Text(text))) => {
                handle_text_message(text.as_str(), &app_state, &sender, &mut timers).await;
            }
            Some(Ok(Message::Close(_))) => {
                info!("Client sent close message.");
                break;
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                warn!("WebSocket receive error: {}", e);
                break;
            }
            None => {
                info!("Client disconnected.");
                break;
            }
        }
    }

    // --- 3. Cleanup ---
    if let Some(kind) = timers.cancel_active() {
        info!("Cancelled timer {} on disconnect.", kind);
    }
    writer.abort();
    info!("Timer connection closed for session {}", session_id);
}

/// Helper function to handle the logic for different `ClientMessage` variants.
async fn handle_text_message(
    text: &str,
    app_state: &Arc<AppState>,
    sender: &mpsc::Sender<ServerMessage>,
    timers: &mut TimerConnection,
) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::StartBoxBreathing) => {
            timers.start(
                TimerKind::BoxBreathing,
                app_state.config.timer_tick,
                sender.clone(),
            );
        }
        Ok(ClientMessage::StartGrounding) => {
            timers.start(
                TimerKind::Grounding,
                app_state.config.timer_tick,
                sender.clone(),
            );
        }
        Ok(ClientMessage::Cancel) => {
            if timers.cancel_active().is_none() {
                let _ = sender
                    .send(ServerMessage::Error {
                        message: "No timer is running.".to_string(),
                    })
                    .await;
            }
        }
        Err(e) => {
            warn!("Failed to deserialize client message: {}", e);
            let _ = sender
                .send(ServerMessage::Error {
                    message: format!("Unrecognized message: {}", e),
                })
                .await;
        }
    }
}
