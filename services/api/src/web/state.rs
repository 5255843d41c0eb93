//! services/api/src/web/state.rs
//!
//! Defines the application's shared and session-specific states.

use crate::config::Config;
use crate::web::protocol::{ClientMessage, ServerMessage};
use axum::extract::ws::{Message, WebSocket};
use document_library_core::{
    controller::{DraftUpdate, SessionController},
    domain::{SendReceipt, SendRequest},
    ports::{DocumentRepository, MailDispatchService},
};
use futures::stream::SplitSink;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// The write half of a WebSocket, shared between the message loop and send tasks.
pub type WsSender = Arc<Mutex<SplitSink<WebSocket, Message>>>;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn DocumentRepository>,
    pub mailer: Arc<dyn MailDispatchService>,
    pub config: Arc<Config>,
}

//=========================================================================================
// SessionState (Specific to One WebSocket Connection)
//=========================================================================================

/// The state for a single, active WebSocket connection.
pub struct SessionState {
    pub session_id: Uuid,
    pub controller: SessionController,
    /// Cancelled when the connection goes away; every send task watches it.
    pub cancellation_token: CancellationToken,
}

/// What the connection loop has to do after an event was applied.
#[derive(Debug, Default)]
pub struct Reaction {
    pub outgoing: Vec<ServerMessage>,
    /// A send the loop must hand to a background task.
    pub send_request: Option<SendRequest>,
}

impl SessionState {
    pub fn new(app_state: &AppState) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            controller: SessionController::new(app_state.catalog.clone()),
            cancellation_token: CancellationToken::new(),
        }
    }

    pub fn snapshot(&self) -> ServerMessage {
        ServerMessage::Snapshot {
            view: self.controller.snapshot(),
            listing: self.controller.listing(),
            categories: self.controller.categories(),
        }
    }

    /// Applies one user event. A fresh snapshot is queued whenever the view
    /// state actually changed.
    pub fn apply(&mut self, msg: ClientMessage) -> Reaction {
        let mut reaction = Reaction::default();
        let changed = match msg {
            ClientMessage::SetSearch { query } => {
                self.controller.set_search_query(query);
                true
            }
            ClientMessage::SetCategory { category } => {
                self.controller.set_category(category);
                true
            }
            ClientMessage::SetView { view } => {
                self.controller.set_view(view);
                true
            }
            ClientMessage::SelectDocument { document_id } => {
                self.controller.select_document(&document_id)
            }
            ClientMessage::CloseViewer => self.controller.close_viewer(),
            ClientMessage::SwitchTab { tab } => self.controller.switch_tab(tab),
            ClientMessage::UpdateDraft {
                recipient,
                subject,
                body,
            } => self.controller.update_draft(DraftUpdate {
                recipient,
                subject,
                body,
            }),
            ClientMessage::Send => match self.controller.begin_send() {
                Some(request) => {
                    reaction.send_request = Some(request);
                    true
                }
                None => false,
            },
            ClientMessage::Download => {
                if let Some(request) = self.controller.download() {
                    reaction
                        .outgoing
                        .push(ServerMessage::Notification(request.notification.clone()));
                    reaction.outgoing.push(ServerMessage::Download(request));
                }
                false
            }
        };
        if changed {
            reaction.outgoing.push(self.snapshot());
        }
        reaction
    }

    /// Feeds a finished send back into the controller.
    pub fn complete_send(&mut self, receipt: &SendReceipt) -> Reaction {
        let mut reaction = Reaction::default();
        if let Some(notification) = self.controller.finish_send(receipt) {
            reaction.outgoing.push(ServerMessage::Notification(notification));
            reaction.outgoing.push(self.snapshot());
        }
        reaction
    }
}
