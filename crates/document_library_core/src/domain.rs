//! crates/document_library_core/src/domain.rs
//!
//! Defines the pure, core data structures for the document library.
//! Serialization derives describe the catalog shape; nothing here touches I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The reserved category label meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Last known send status of a document's email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    Sent,
    Draft,
    Scheduled,
}

/// A retrievable file plus its display and email-tracking metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Human-readable, free text ("2.4 MB").
    pub file_size: String,
    pub thumbnail_url: String,
    pub file_url: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_status: Option<EmailStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sent_date: Option<DateTime<Utc>>,
}

impl Document {
    /// Case-insensitive substring match against title or description.
    /// An empty query matches every document.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }

    /// Exact, case-sensitive category match. `All` and the empty label match everything.
    pub fn in_category(&self, category: &str) -> bool {
        category.is_empty() || category == ALL_CATEGORIES || self.category == category
    }
}

/// Which list the user is browsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveView {
    #[default]
    All,
    /// Only documents that have been addressed by the send flow.
    Emails,
}

impl ActiveView {
    pub fn admits(&self, document: &Document) -> bool {
        match self {
            ActiveView::All => true,
            ActiveView::Emails => document.email_status.is_some(),
        }
    }
}

/// The tab shown inside an open viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerTab {
    #[default]
    Preview,
    Email,
}

/// Draft email fields, scoped to one viewer session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl EmailDraft {
    /// Builds the default draft for a document. Called on every switch to the
    /// email tab; the result always overwrites whatever was there before.
    pub fn for_document(document: &Document) -> Self {
        Self {
            recipient: document.recipient_email.clone().unwrap_or_default(),
            subject: format!("{} - Document for your review", document.title),
            body: format!(
                "Hello,\n\nPlease find attached \"{}\" for your review.\n\nLet me know if you have any questions.\n\nBest regards",
                document.title
            ),
        }
    }

    /// A send needs a recipient; whitespace alone does not count.
    pub fn has_recipient(&self) -> bool {
        !self.recipient.trim().is_empty()
    }
}

/// A user-visible message the rendering layer must surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn email_sent(title: &str, recipient: &str) -> Self {
        Self {
            title: "Email sent successfully!".to_string(),
            description: format!("\"{}\" was sent to {}", title, recipient),
        }
    }

    pub fn download_started(title: &str) -> Self {
        Self {
            title: "Download started".to_string(),
            description: format!("Downloading {}...", title),
        }
    }
}

/// A transient retrieval request for a document's file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    pub file_name: String,
    pub notification: Notification,
}

impl DownloadRequest {
    pub fn for_document(document: &Document) -> Self {
        Self {
            url: document.file_url.clone(),
            file_name: format!("{}.pdf", document.title),
            notification: Notification::download_started(&document.title),
        }
    }
}

/// Hint for the rendering layer when a listing comes back empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyState {
    pub heading: String,
    pub detail: String,
}

impl EmptyState {
    pub fn new(query_active: bool) -> Self {
        let detail = if query_active {
            "Try adjusting your search or filters"
        } else {
            "There are no documents in this category yet"
        };
        Self {
            heading: "No documents found".to_string(),
            detail: detail.to_string(),
        }
    }
}

/// Identifies one in-flight send so a late completion can be matched
/// against the viewer session that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SendTicket(pub Uuid);

impl SendTicket {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SendTicket {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a mail dispatcher needs for one send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub ticket: SendTicket,
    pub document_id: String,
    pub document_title: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Proof of a completed send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub ticket: SendTicket,
    pub recipient: String,
    pub document_title: String,
    pub sent_at: DateTime<Utc>,
}

impl SendReceipt {
    pub fn for_request(request: &SendRequest, sent_at: DateTime<Utc>) -> Self {
        Self {
            ticket: request.ticket,
            recipient: request.recipient.clone(),
            document_title: request.document_title.clone(),
            sent_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::sample_documents;

    #[test]
    fn draft_defaults_use_title_and_stored_recipient() {
        let mut doc = sample_documents().remove(0);
        let draft = EmailDraft::for_document(&doc);
        assert_eq!(draft.recipient, "");
        assert_eq!(
            draft.subject,
            "Annual Financial Report 2024 - Document for your review"
        );
        assert!(draft.body.contains("Annual Financial Report 2024"));

        doc.recipient_email = Some("cfo@example.com".to_string());
        assert_eq!(EmailDraft::for_document(&doc).recipient, "cfo@example.com");
    }

    #[test]
    fn blank_recipient_does_not_count() {
        let draft = EmailDraft {
            recipient: "   ".to_string(),
            ..Default::default()
        };
        assert!(!draft.has_recipient());
    }

    #[test]
    fn emails_view_requires_a_status() {
        let mut doc = sample_documents().remove(1);
        assert!(ActiveView::All.admits(&doc));
        assert!(!ActiveView::Emails.admits(&doc));
        doc.email_status = Some(EmailStatus::Draft);
        assert!(ActiveView::Emails.admits(&doc));
    }

    #[test]
    fn document_uses_camel_case_on_the_wire() {
        let doc = sample_documents().remove(0);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["fileUrl"], "https://www.africau.edu/images/default/sample.pdf");
        assert!(json.get("emailStatus").is_none());
    }

    #[test]
    fn download_names_the_file_after_the_title() {
        let doc = sample_documents().remove(7);
        let request = DownloadRequest::for_document(&doc);
        assert_eq!(request.file_name, "Legal Contract.pdf");
        assert_eq!(request.notification.title, "Download started");
        assert_eq!(request.notification.description, "Downloading Legal Contract...");
    }
}
