//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the rendering front end and
//! the server. One connection drives exactly one browsing session.

use axum::extract::ws::Message;
use document_library_core::{
    controller::ViewSnapshot,
    domain::{ActiveView, DownloadRequest, Notification, ViewerTab},
    query::Listing,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// User-initiated events. Each one is applied to the session's view state in
/// arrival order.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// The search box changed.
    SetSearch { query: String },

    /// A category tab was clicked.
    SetCategory { category: String },

    /// Switches between all documents and the emails view.
    SetView { view: ActiveView },

    /// A document card was clicked.
    SelectDocument { document_id: String },

    CloseViewer,

    SwitchTab { tab: ViewerTab },

    /// Edits the email draft; omitted fields are left untouched.
    UpdateDraft {
        #[serde(default)]
        recipient: Option<String>,
        #[serde(default)]
        subject: Option<String>,
        #[serde(default)]
        body: Option<String>,
    },

    Send,

    Download,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once when the connection is accepted.
    SessionInitialized { session_id: Uuid },

    /// The full picture after every accepted event.
    Snapshot {
        view: ViewSnapshot,
        listing: Listing,
        categories: Vec<String>,
    },

    /// A toast for the user.
    Notification(Notification),

    /// Ask the front end to retrieve a file.
    Download(DownloadRequest),

    /// Reports a problem with a client message.
    Error { message: String },
}

impl ServerMessage {
    pub fn to_ws_message(&self) -> Result<Message, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(Message::Text(json.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_client_events() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"select_document","document_id":"2"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::SelectDocument {
                document_id: "2".to_string()
            }
        );

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"set_view","view":"emails"}"#).unwrap();
        assert_eq!(msg, ClientMessage::SetView { view: ActiveView::Emails });

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"update_draft","recipient":"a@example.com"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::UpdateDraft {
                recipient: Some("a@example.com".to_string()),
                subject: None,
                body: None
            }
        );

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"send"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Send);
    }

    #[test]
    fn rejects_unknown_events() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"delete_everything"}"#).is_err());
    }

    #[test]
    fn notifications_are_tagged_inline() {
        let msg = ServerMessage::Notification(Notification::download_started("Legal Contract"));
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "notification");
        assert_eq!(json["title"], "Download started");
        assert_eq!(json["description"], "Downloading Legal Contract...");
    }
}
