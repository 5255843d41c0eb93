//! services/api/src/adapters/catalog.rs
//!
//! Loads the document catalog served by this process.

use crate::error::ApiError;
use document_library_core::store::InMemoryDocumentStore;
use std::path::Path;
use tracing::info;

/// Reads the catalog from `path` when given, otherwise falls back to the
/// built-in data set. Either way the catalog invariants are checked up front.
pub async fn load_catalog(path: Option<&Path>) -> Result<InMemoryDocumentStore, ApiError> {
    let store = match path {
        Some(path) => {
            info!("Loading document catalog from {}", path.display());
            let json = tokio::fs::read_to_string(path).await?;
            InMemoryDocumentStore::from_json(&json)?
        }
        None => {
            info!("Using the built-in document catalog");
            InMemoryDocumentStore::builtin()?
        }
    };
    info!("Catalog ready with {} documents", store.len());
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use document_library_core::ports::{DocumentRepository, PortError};
    use std::io::Write;

    #[tokio::test]
    async fn falls_back_to_the_builtin_catalog() {
        let store = load_catalog(None).await.unwrap();
        assert_eq!(store.len(), 8);
    }

    #[tokio::test]
    async fn reads_a_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{
                "id": "a",
                "title": "Board Minutes",
                "description": "Minutes of the March board meeting",
                "createdAt": "2024-03-01T10:00:00Z",
                "updatedAt": "2024-03-02T10:00:00Z",
                "fileSize": "120 KB",
                "thumbnailUrl": "https://example.com/a.png",
                "fileUrl": "https://example.com/a.pdf",
                "category": "Governance",
                "emailStatus": "sent",
                "lastSentDate": "2024-03-03T10:00:00Z"
            }}]"#
        )
        .unwrap();

        let store = load_catalog(Some(file.path())).await.unwrap();
        assert_eq!(store.by_id("a").unwrap().category, "Governance");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let result = load_catalog(Some(Path::new("/definitely/not/here.json"))).await;
        assert!(matches!(result, Err(ApiError::Io(_))));
    }

    #[tokio::test]
    async fn invalid_catalog_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]oops").unwrap();
        let result = load_catalog(Some(file.path())).await;
        assert!(matches!(
            result,
            Err(ApiError::Port(PortError::InvalidCatalog(_)))
        ));
    }
}
