//! crates/document_library_core/src/controller.rs
//!
//! The Selection / View State Controller.
//!
//! One [`SessionController`] owns the view state of a single browsing session.
//! The viewer is a tagged union: everything that only makes sense while a
//! document is open (tab, email draft, in-flight send) lives inside
//! [`ViewerState::Open`], so a send can never be in flight with the viewer closed.
//!
//! Every transition is a plain method. A transition that is not legal from the
//! current state is a no-op and reports so through its return value.

use crate::domain::{
    ActiveView, Document, DownloadRequest, EmailDraft, Notification, SendReceipt, SendRequest,
    SendTicket, ViewerTab, ALL_CATEGORIES,
};
use crate::ports::DocumentRepository;
use crate::query::{DocumentFilter, Listing, QueryEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// The observable phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Viewer closed.
    Browsing,
    /// Viewer open on the preview tab.
    Previewing,
    /// Viewer open on the email tab.
    Composing,
    /// Composing with a send in flight.
    Sending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenViewer {
    /// Weak reference into the repository.
    pub document_id: String,
    pub tab: ViewerTab,
    /// `None` until the email tab is first shown in this viewer session.
    pub draft: Option<EmailDraft>,
    pub in_flight: Option<SendTicket>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewerState {
    #[default]
    Closed,
    Open(OpenViewer),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search_query: String,
    pub active_category: String,
    pub active_view: ActiveView,
    pub viewer: ViewerState,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            active_category: ALL_CATEGORIES.to_string(),
            active_view: ActiveView::All,
            viewer: ViewerState::Closed,
        }
    }
}

impl ViewState {
    pub fn phase(&self) -> Phase {
        match &self.viewer {
            ViewerState::Closed => Phase::Browsing,
            ViewerState::Open(open) => match (open.tab, open.in_flight) {
                (ViewerTab::Preview, _) => Phase::Previewing,
                (ViewerTab::Email, None) => Phase::Composing,
                (ViewerTab::Email, Some(_)) => Phase::Sending,
            },
        }
    }

    pub fn viewer_open(&self) -> bool {
        matches!(self.viewer, ViewerState::Open(_))
    }

    pub fn send_in_progress(&self) -> bool {
        matches!(&self.viewer, ViewerState::Open(open) if open.in_flight.is_some())
    }

    pub fn selected_document_id(&self) -> Option<&str> {
        match &self.viewer {
            ViewerState::Closed => None,
            ViewerState::Open(open) => Some(open.document_id.as_str()),
        }
    }

    pub fn filter(&self) -> DocumentFilter {
        DocumentFilter {
            category: self.active_category.clone(),
            query: self.search_query.clone(),
            view: self.active_view,
        }
    }
}

/// Partial edit of the email draft. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftUpdate {
    pub recipient: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

/// A flat, serializable picture of the view state for the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub phase: Phase,
    pub search_query: String,
    pub active_category: String,
    pub active_view: ActiveView,
    pub selected_document_id: Option<String>,
    pub viewer_open: bool,
    pub tab: Option<ViewerTab>,
    pub send_in_progress: bool,
    pub email_form: Option<EmailDraft>,
}

pub struct SessionController {
    repo: Arc<dyn DocumentRepository>,
    state: ViewState,
}

impl SessionController {
    pub fn new(repo: Arc<dyn DocumentRepository>) -> Self {
        Self {
            repo,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(self.repo.as_ref())
    }

    //=====================================================================================
    // Filters
    //=====================================================================================

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.search_query = query.into();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.state.active_category = category.into();
    }

    pub fn set_view(&mut self, view: ActiveView) {
        self.state.active_view = view;
    }

    pub fn visible_documents(&self) -> Vec<&Document> {
        self.engine().filter(&self.state.filter())
    }

    pub fn listing(&self) -> Listing {
        self.engine().listing(&self.state.filter())
    }

    pub fn categories(&self) -> Vec<String> {
        self.engine().categories()
    }

    //=====================================================================================
    // Viewer
    //=====================================================================================

    /// Resolves the weak reference; a stale id reads as "nothing selected".
    pub fn selected_document(&self) -> Option<&Document> {
        self.state
            .selected_document_id()
            .and_then(|id| self.repo.by_id(id))
    }

    /// Browsing -> Previewing.
    pub fn select_document(&mut self, id: &str) -> bool {
        if self.state.viewer_open() {
            debug!(document_id = id, "Ignoring selection while the viewer is open");
            return false;
        }
        if self.repo.by_id(id).is_none() {
            debug!(document_id = id, "Ignoring selection of an unknown document");
            return false;
        }
        info!(document_id = id, "Opening viewer");
        self.state.viewer = ViewerState::Open(OpenViewer {
            document_id: id.to_string(),
            tab: ViewerTab::Preview,
            draft: None,
            in_flight: None,
        });
        true
    }

    /// Any viewer state -> Browsing. The draft is discarded. An in-flight send
    /// is detached: it finishes on its own and its receipt is ignored.
    pub fn close_viewer(&mut self) -> bool {
        match std::mem::take(&mut self.state.viewer) {
            ViewerState::Closed => false,
            ViewerState::Open(open) => {
                if let Some(ticket) = open.in_flight {
                    info!(ticket = %ticket.0, "Viewer closed with a send in flight; detaching it");
                }
                info!(document_id = %open.document_id, "Closing viewer");
                true
            }
        }
    }

    /// Preview <-> Email. Entering the email tab always rebuilds the draft from
    /// the document; returning to preview keeps it until the viewer closes.
    pub fn switch_tab(&mut self, tab: ViewerTab) -> bool {
        let fresh_draft = match (tab, self.selected_document()) {
            (ViewerTab::Email, Some(doc)) => Some(EmailDraft::for_document(doc)),
            _ => None,
        };
        let ViewerState::Open(open) = &mut self.state.viewer else {
            return false;
        };
        if open.tab == tab {
            return false;
        }
        open.tab = tab;
        if let Some(draft) = fresh_draft {
            open.draft = Some(draft);
        }
        debug!(?tab, "Switched viewer tab");
        true
    }

    /// Edits the draft while composing. Ignored while a send is in flight.
    pub fn update_draft(&mut self, update: DraftUpdate) -> bool {
        let ViewerState::Open(open) = &mut self.state.viewer else {
            return false;
        };
        if open.tab != ViewerTab::Email || open.in_flight.is_some() {
            return false;
        }
        let Some(draft) = open.draft.as_mut() else {
            return false;
        };
        if let Some(recipient) = update.recipient {
            draft.recipient = recipient;
        }
        if let Some(subject) = update.subject {
            draft.subject = subject;
        }
        if let Some(body) = update.body {
            draft.body = body;
        }
        true
    }

    /// Composing -> Sending. Returns the request to hand to a mail dispatcher,
    /// or `None` when sending is not available (wrong phase, empty recipient,
    /// or a send already in flight for this viewer session).
    pub fn begin_send(&mut self) -> Option<SendRequest> {
        if self.phase() != Phase::Composing {
            return None;
        }
        let title = self.selected_document()?.title.clone();
        let ViewerState::Open(open) = &mut self.state.viewer else {
            return None;
        };
        let draft = open.draft.as_ref()?;
        if !draft.has_recipient() {
            debug!("Send unavailable without a recipient");
            return None;
        }
        let ticket = SendTicket::new();
        let request = SendRequest {
            ticket,
            document_id: open.document_id.clone(),
            document_title: title,
            recipient: draft.recipient.trim().to_string(),
            subject: draft.subject.clone(),
            body: draft.body.clone(),
        };
        open.in_flight = Some(ticket);
        info!(ticket = %ticket.0, document_id = %request.document_id, "Send started");
        Some(request)
    }

    /// Sending -> Previewing. A receipt that does not belong to the current
    /// viewer session is dropped without a notification.
    pub fn finish_send(&mut self, receipt: &SendReceipt) -> Option<Notification> {
        let ViewerState::Open(open) = &mut self.state.viewer else {
            debug!(ticket = %receipt.ticket.0, "Dropping receipt for a closed viewer");
            return None;
        };
        if open.in_flight != Some(receipt.ticket) {
            debug!(ticket = %receipt.ticket.0, "Dropping receipt for a stale send");
            return None;
        }
        open.in_flight = None;
        open.tab = ViewerTab::Preview;
        info!(ticket = %receipt.ticket.0, recipient = %receipt.recipient, "Send completed");
        Some(Notification::email_sent(
            &receipt.document_title,
            &receipt.recipient,
        ))
    }

    /// Builds a retrieval request for the open document. Leaves the state alone.
    pub fn download(&self) -> Option<DownloadRequest> {
        self.selected_document().map(DownloadRequest::for_document)
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let (tab, email_form) = match &self.state.viewer {
            ViewerState::Closed => (None, None),
            ViewerState::Open(open) => (Some(open.tab), open.draft.clone()),
        };
        ViewSnapshot {
            phase: self.phase(),
            search_query: self.state.search_query.clone(),
            active_category: self.state.active_category.clone(),
            active_view: self.state.active_view,
            selected_document_id: self.state.selected_document_id().map(str::to_string),
            viewer_open: self.state.viewer_open(),
            tab,
            send_in_progress: self.state.send_in_progress(),
            email_form,
        }
    }
}
