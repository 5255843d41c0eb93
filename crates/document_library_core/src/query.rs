//! crates/document_library_core/src/query.rs
//!
//! The Query Engine: pure functions over a [`DocumentRepository`] that compute
//! which documents are displayed for a given category, free-text query and view.

use crate::domain::{ActiveView, Document, EmptyState, ALL_CATEGORIES};
use crate::ports::DocumentRepository;
use serde::{Deserialize, Serialize};

/// The `(category, query, view)` triple that decides the visible list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentFilter {
    pub category: String,
    pub query: String,
    pub view: ActiveView,
}

impl Default for DocumentFilter {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            query: String::new(),
            view: ActiveView::All,
        }
    }
}

impl DocumentFilter {
    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }
}

/// What the rendering layer receives for one filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub documents: Vec<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<EmptyState>,
}

#[derive(Clone, Copy)]
pub struct QueryEngine<'a> {
    repo: &'a dyn DocumentRepository,
}

impl<'a> QueryEngine<'a> {
    pub fn new(repo: &'a dyn DocumentRepository) -> Self {
        Self { repo }
    }

    /// `All` or an empty label returns the full set; anything else is an exact, case-sensitive match.
    pub fn by_category(&self, category: &str) -> Vec<&'a Document> {
        self.repo
            .list()
            .iter()
            .filter(|doc| doc.in_category(category))
            .collect()
    }

    /// Case-insensitive substring search over title and description.
    pub fn search(&self, query: &str) -> Vec<&'a Document> {
        self.repo
            .list()
            .iter()
            .filter(|doc| doc.matches_query(query))
            .collect()
    }

    /// `All` first, then each distinct category in first-occurrence order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for doc in self.repo.list() {
            if !categories.iter().any(|c| c == &doc.category) {
                categories.push(doc.category.clone());
            }
        }
        categories
    }

    /// Applies the composed filter.
    ///
    /// Without a query the category subset is the starting point. With one,
    /// the search runs over the whole store and the category and view
    /// predicates are then applied as conjunctive filters.
    pub fn filter(&self, filter: &DocumentFilter) -> Vec<&'a Document> {
        let mut documents = if filter.has_query() {
            let mut hits = self.search(&filter.query);
            hits.retain(|doc| doc.in_category(&filter.category));
            hits
        } else {
            self.by_category(&filter.category)
        };
        documents.retain(|doc| filter.view.admits(doc));
        documents
    }

    pub fn listing(&self, filter: &DocumentFilter) -> Listing {
        let documents: Vec<Document> = self.filter(filter).into_iter().cloned().collect();
        let empty_state = documents
            .is_empty()
            .then(|| EmptyState::new(filter.has_query()));
        Listing {
            documents,
            empty_state,
        }
    }
}
