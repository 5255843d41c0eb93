pub mod controller;
pub mod domain;
pub mod ports;
pub mod query;
pub mod store;

pub use controller::{DraftUpdate, Phase, SessionController, ViewSnapshot, ViewState, ViewerState};
pub use domain::{
    ActiveView, Document, DownloadRequest, EmailDraft, EmailStatus, EmptyState, Notification,
    SendReceipt, SendRequest, SendTicket, ViewerTab, ALL_CATEGORIES,
};
pub use ports::{DocumentRepository, MailDispatchService, PortError, PortResult};
pub use query::{DocumentFilter, Listing, QueryEngine};
pub use store::InMemoryDocumentStore;
