//! crates/document_library_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the document library core.
//! These traits form the boundary of the hexagonal architecture, so the query
//! engine and the view controller never depend on where documents come from
//! or how mail actually leaves the process.

use async_trait::async_trait;
use crate::domain::{Document, SendReceipt, SendRequest};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid document catalog: {0}")]
    InvalidCatalog(String),
    #[error("Operation cancelled")]
    Cancelled,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Read-only access to the document collection.
///
/// Reads are purely referential; implementations must return documents in a
/// stable insertion order and never mutate them at runtime.
pub trait DocumentRepository: Send + Sync {
    /// The full ordered collection.
    fn list(&self) -> &[Document];

    /// Looks up a single document. A miss means "nothing selected", never an error.
    fn by_id(&self, id: &str) -> Option<&Document> {
        self.list().iter().find(|doc| doc.id == id)
    }

    /// Like [`by_id`](Self::by_id), for callers that treat a miss as an error.
    fn get(&self, id: &str) -> PortResult<&Document> {
        self.by_id(id)
            .ok_or_else(|| PortError::NotFound(format!("document '{}'", id)))
    }
}

#[async_trait]
pub trait MailDispatchService: Send + Sync {
    /// Dispatches one email. The caller guarantees a non-empty recipient.
    async fn send(&self, request: &SendRequest) -> PortResult<SendReceipt>;
}
