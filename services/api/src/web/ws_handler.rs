//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a WebSocket connection.
//! Each connection owns one browsing session: user events are applied to the
//! session's view state one at a time, and sends run as background tasks.

use crate::error::ApiError;
use crate::web::{
    protocol::{ClientMessage, ServerMessage},
    send_task::send_process,
    state::{AppState, SessionState, WsSender},
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{stream::StreamExt, SinkExt};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

/// Serializes and sends one message.
pub(crate) async fn push(ws_sender: &WsSender, msg: &ServerMessage) -> Result<(), ApiError> {
    let frame = msg.to_ws_message()?;
    ws_sender.lock().await.send(frame).await?;
    Ok(())
}

pub(crate) async fn push_all(ws_sender: &WsSender, msgs: &[ServerMessage]) -> Result<(), ApiError> {
    for msg in msgs {
        push(ws_sender, msg).await?;
    }
    Ok(())
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let ws_sender: WsSender = Arc::new(Mutex::new(sender));

    // --- 1. Initialization Phase ---
    let session = SessionState::new(&app_state);
    let session_id = session.session_id;
    let cancellation_token = session.cancellation_token.clone();
    let greeting = [
        ServerMessage::SessionInitialized { session_id },
        session.snapshot(),
    ];
    let session_state_lock = Arc::new(Mutex::new(session));
    info!("New browsing session {} established.", session_id);

    if let Err(e) = push_all(&ws_sender, &greeting).await {
        error!("Failed to send the initial snapshot: {}", e);
        return;
    }

    // --- 2. Main Message Loop ---
    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => {
                if let Err(e) =
                    handle_text_message(text.as_str(), &app_state, &session_state_lock, &ws_sender).await
                {
                    error!("Failed to answer client message: {}", e);
                    break;
                }
            }
            Message::Close(_) => {
                info!("Client sent close message.");
                break;
            }
            _ => {}
        }
    }

    // --- 3. Cleanup ---
    // In-flight sends belong to this session only.
    cancellation_token.cancel();
    info!("Browsing session {} closed.", session_id);
}

/// Applies one text frame to the session and pushes the resulting messages.
async fn handle_text_message(
    text: &str,
    app_state: &Arc<AppState>,
    session_state_lock: &Arc<Mutex<SessionState>>,
    ws_sender: &WsSender,
) -> Result<(), ApiError> {
    let client_msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("Failed to deserialize client message: {}", e);
            let err_msg = ServerMessage::Error {
                message: format!("Unrecognized message: {}", e),
            };
            return push(ws_sender, &err_msg).await;
        }
    };

    // Held across the push; see `send_process`.
    let mut session = session_state_lock.lock().await;
    let reaction = session.apply(client_msg);
    let token = session.cancellation_token.clone();
    push_all(ws_sender, &reaction.outgoing).await?;
    drop(session);

    if let Some(request) = reaction.send_request {
        let app_state = app_state.clone();
        let session_state_lock = session_state_lock.clone();
        let ws_sender = ws_sender.clone();
        tokio::spawn(async move {
            if let Err(e) = send_process(app_state, session_state_lock, ws_sender, request, token).await {
                error!("Send process failed: {}", e);
            }
        });
    }

    Ok(())
}
