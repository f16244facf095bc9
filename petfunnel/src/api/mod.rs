//! HTTP API layer.
//!
//! - [`handlers`]: Axum route handlers, one module per resource
//! - [`models`]: Request and response types, with OpenAPI schemas

pub mod handlers;
pub mod models;
