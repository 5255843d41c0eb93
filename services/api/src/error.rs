//! services/api/src/error.rs
//!
//! The error type shared by the server binary, the catalog loader and the
//! WebSocket session tasks.

use crate::config::ConfigError;
use document_library_core::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad or unparsable environment settings at startup.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog validation, a missing document, or a failed dispatch.
    #[error("Port error: {0}")]
    Port(#[from] PortError),

    /// The client's socket went away mid-write.
    #[error("WebSocket error: {0}")]
    Websocket(#[from] axum::Error),

    /// A server message could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading the catalog file or binding the listener.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
