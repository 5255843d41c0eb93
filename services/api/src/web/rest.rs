//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the read-only REST endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use document_library_core::{
    domain::{ActiveView, Document, EmptyState, ALL_CATEGORIES},
    ports::{DocumentRepository, PortError},
    query::{DocumentFilter, QueryEngine},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_documents_handler,
        get_document_handler,
        list_categories_handler,
    ),
    components(
        schemas(DocumentListResponse, DocumentResponse, CategoriesResponse)
    ),
    tags(
        (name = "Document Library API", description = "Read-only queries over the document library.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Query string for the document listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListDocumentsParams {
    /// Category label; `All` or absent disables the category filter.
    category: Option<String>,
    /// Free-text query matched against title and description.
    q: Option<String>,
    /// `all` (default) or `emails`.
    #[param(value_type = Option<String>)]
    view: Option<ActiveView>,
}

impl From<ListDocumentsParams> for DocumentFilter {
    fn from(params: ListDocumentsParams) -> Self {
        Self {
            category: params
                .category
                .unwrap_or_else(|| ALL_CATEGORIES.to_string()),
            query: params.q.unwrap_or_default(),
            view: params.view.unwrap_or_default(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DocumentListResponse {
    #[schema(value_type = Vec<Object>)]
    documents: Vec<Document>,
    total: usize,
    #[schema(value_type = Option<Object>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    empty_state: Option<EmptyState>,
}

#[derive(Serialize, ToSchema)]
pub struct DocumentResponse {
    #[schema(value_type = Object)]
    document: Document,
}

#[derive(Serialize, ToSchema)]
pub struct CategoriesResponse {
    categories: Vec<String>,
}

/// Maps a port failure onto the HTTP status the client sees.
fn port_error_response(err: PortError) -> (StatusCode, String) {
    match err {
        PortError::NotFound(what) => (StatusCode::NOT_FOUND, format!("Not found: {}", what)),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the documents matching a category, a free-text query and a view.
#[utoipa::path(
    get,
    path = "/documents",
    params(ListDocumentsParams),
    responses(
        (status = 200, description = "Matching documents, in catalog order", body = DocumentListResponse)
    )
)]
pub async fn list_documents_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<ListDocumentsParams>,
) -> Json<DocumentListResponse> {
    let filter = DocumentFilter::from(params);
    let listing = QueryEngine::new(app_state.catalog.as_ref()).listing(&filter);
    debug!(?filter, total = listing.documents.len(), "Listed documents");
    Json(DocumentListResponse {
        total: listing.documents.len(),
        documents: listing.documents,
        empty_state: listing.empty_state,
    })
}

/// Fetch a single document by id.
#[utoipa::path(
    get,
    path = "/documents/{id}",
    params(
        ("id" = String, Path, description = "The document id.")
    ),
    responses(
        (status = 200, description = "The document", body = DocumentResponse),
        (status = 404, description = "No document with that id")
    )
)]
pub async fn get_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DocumentResponse>, (StatusCode, String)> {
    let document = app_state
        .catalog
        .get(&id)
        .map_err(port_error_response)?
        .clone();
    Ok(Json(DocumentResponse { document }))
}

/// List the category tabs, `All` first.
#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "Category labels", body = CategoriesResponse)
    )
)]
pub async fn list_categories_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<CategoriesResponse> {
    let categories = QueryEngine::new(app_state.catalog.as_ref()).categories();
    Json(CategoriesResponse { categories })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_default_to_the_unfiltered_listing() {
        let filter = DocumentFilter::from(ListDocumentsParams::default());
        assert_eq!(filter, DocumentFilter::default());
    }

    #[test]
    fn empty_category_param_is_kept_as_given() {
        let filter = DocumentFilter::from(ListDocumentsParams {
            category: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(filter.category, "");
    }

    #[test]
    fn not_found_maps_to_404_and_the_rest_to_500() {
        let (status, body) = port_error_response(PortError::NotFound("document '9'".to_string()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("document '9'"));
        let (status, _) = port_error_response(PortError::Cancelled);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.contains(&&"/documents".to_string()));
        assert!(paths.contains(&&"/documents/{id}".to_string()));
        assert!(paths.contains(&&"/categories".to_string()));
    }
}
