//! services/api/src/lib.rs
//!
//! The document library service: adapters for the core ports plus the REST and
//! WebSocket surface consumed by the rendering front end.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
