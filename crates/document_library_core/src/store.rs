//! crates/document_library_core/src/store.rs
//!
//! The in-memory Document Store: a fixed, validated collection loaded once
//! and only ever read afterwards.

use crate::domain::{Document, EmailStatus};
use crate::ports::{DocumentRepository, PortError, PortResult};
use std::collections::HashSet;
use tracing::debug;

const BUILTIN_CATALOG: &str = include_str!("../data/documents.json");

/// A read-only repository over a vector of documents, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Vec<Document>,
}

impl InMemoryDocumentStore {
    /// Builds a store after checking the catalog invariants.
    pub fn new(documents: Vec<Document>) -> PortResult<Self> {
        validate(&documents)?;
        debug!(count = documents.len(), "Document store loaded");
        Ok(Self { documents })
    }

    /// Parses a JSON array of documents.
    pub fn from_json(json: &str) -> PortResult<Self> {
        let documents: Vec<Document> = serde_json::from_str(json)
            .map_err(|e| PortError::InvalidCatalog(e.to_string()))?;
        Self::new(documents)
    }

    /// The catalog that ships with the library.
    pub fn builtin() -> PortResult<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentRepository for InMemoryDocumentStore {
    fn list(&self) -> &[Document] {
        &self.documents
    }
}

fn validate(documents: &[Document]) -> PortResult<()> {
    let mut seen = HashSet::new();
    for doc in documents {
        if !seen.insert(doc.id.as_str()) {
            return Err(PortError::InvalidCatalog(format!(
                "duplicate document id '{}'",
                doc.id
            )));
        }
        if doc.updated_at < doc.created_at {
            return Err(PortError::InvalidCatalog(format!(
                "document '{}' was updated before it was created",
                doc.id
            )));
        }
        if doc.last_sent_date.is_some() && doc.email_status != Some(EmailStatus::Sent) {
            return Err(PortError::InvalidCatalog(format!(
                "document '{}' has a last sent date but was never sent",
                doc.id
            )));
        }
    }
    Ok(())
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use chrono::{TimeZone, Utc};

    /// The literal built-in catalog: eight documents, ids "1" through "8".
    pub fn sample_documents() -> Vec<Document> {
        InMemoryDocumentStore::builtin()
            .expect("built-in catalog is valid")
            .documents
    }

    pub struct StoreFixture {
        documents: Vec<Document>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                documents: sample_documents(),
            }
        }

        pub fn empty() -> Self {
            Self {
                documents: Vec::new(),
            }
        }

        pub fn with_recipient(mut self, id: &str, recipient: &str) -> Self {
            if let Some(doc) = self.documents.iter_mut().find(|d| d.id == id) {
                doc.recipient_email = Some(recipient.to_string());
            }
            self
        }

        pub fn with_email_status(mut self, id: &str, status: EmailStatus) -> Self {
            if let Some(doc) = self.documents.iter_mut().find(|d| d.id == id) {
                doc.email_status = Some(status);
                if status == EmailStatus::Sent {
                    doc.last_sent_date = Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
                }
            }
            self
        }

        pub fn build(self) -> InMemoryDocumentStore {
            InMemoryDocumentStore::new(self.documents).expect("fixture catalog is valid")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{sample_documents, StoreFixture};
    use super::*;

    #[test]
    fn builtin_catalog_keeps_insertion_order() {
        let store = InMemoryDocumentStore::builtin().unwrap();
        let ids: Vec<&str> = store.list().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
    }

    #[test]
    fn by_id_hit_and_miss() {
        let store = StoreFixture::new().build();
        assert_eq!(store.by_id("3").unwrap().title, "HR Policy Manual");
        assert!(store.by_id("42").is_none());
    }

    #[test]
    fn get_reports_a_miss_as_not_found() {
        let store = StoreFixture::new().build();
        assert_eq!(store.get("8").unwrap().category, "Legal");
        match store.get("42") {
            Err(PortError::NotFound(what)) => assert!(what.contains("42")),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut docs = sample_documents();
        docs[1].id = "1".to_string();
        match InMemoryDocumentStore::new(docs) {
            Err(PortError::InvalidCatalog(msg)) => assert!(msg.contains("duplicate")),
            other => panic!("Expected InvalidCatalog, got {:?}", other),
        }
    }

    #[test]
    fn rejects_update_before_creation() {
        let mut docs = sample_documents();
        docs[0].updated_at = docs[0].created_at - chrono::Duration::days(1);
        assert!(matches!(
            InMemoryDocumentStore::new(docs),
            Err(PortError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn rejects_sent_date_without_sent_status() {
        let mut docs = sample_documents();
        docs[0].email_status = Some(EmailStatus::Draft);
        docs[0].last_sent_date = Some(docs[0].updated_at);
        assert!(matches!(
            InMemoryDocumentStore::new(docs),
            Err(PortError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn malformed_json_is_an_invalid_catalog() {
        assert!(matches!(
            InMemoryDocumentStore::from_json("{ not json"),
            Err(PortError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn fixture_sent_status_satisfies_invariants() {
        let store = StoreFixture::new()
            .with_email_status("2", EmailStatus::Sent)
            .with_recipient("2", "pm@example.com")
            .build();
        let doc = store.by_id("2").unwrap();
        assert_eq!(doc.email_status, Some(EmailStatus::Sent));
        assert!(doc.last_sent_date.is_some());
        assert!(StoreFixture::empty().build().is_empty());
    }
}
