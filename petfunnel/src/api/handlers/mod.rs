//! HTTP request handlers for all API endpoints.
//!
//! # Handler Modules
//!
//! - [`landing`]: Public landing page content
//! - [`registrations`]: The registration form
//! - [`questionnaire`]: The step-by-step questionnaire dialog
//! - [`payments`]: Optional PIX donation
//! - [`events`]: Client analytics events
//! - [`admin`]: Admin login and both dashboards
//!
//! # Authentication
//!
//! Public routes need nothing. Admin routes take a [`crate::auth::current_admin::CurrentAdmin`]
//! extractor, which rejects requests without a valid session cookie.
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`], which converts to a status code and a
//! `{ "message": ... }` body.

pub mod admin;
pub mod events;
pub mod landing;
pub mod payments;
pub mod questionnaire;
pub mod registrations;

use axum::http::{HeaderMap, header::USER_AGENT};

/// Client address: the first `X-Forwarded-For` entry, then `X-Real-IP`, else `"unknown"`.
pub fn client_ip(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded.or_else(real_ip).unwrap_or("unknown").to_string()
}

pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers.get(USER_AGENT).and_then(|v| v.to_str().ok()).map(str::to_string)
}

/// The client's analytics session, or a fresh one on first contact
pub fn session_or_new(session_id: Option<String>) -> String {
    session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}
