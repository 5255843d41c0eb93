pub mod protocol;
pub mod rest;
pub mod send_task;
pub mod state;
pub mod ws_handler;

use axum::{
    http::{header::{ACCEPT, CONTENT_TYPE}, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

// Re-export the main handlers to make them easily accessible
// to the binary that builds the web server router.
pub use rest::{get_document_handler, list_categories_handler, list_documents_handler};
pub use state::AppState;
pub use ws_handler::ws_handler;

/// Builds the API router: read-only REST queries plus the session WebSocket.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(app_state.config.allowed_origin.clone())
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    Router::new()
        .route("/documents", get(list_documents_handler))
        .route("/documents/{id}", get(get_document_handler))
        .route("/categories", get(list_categories_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(app_state)
}
