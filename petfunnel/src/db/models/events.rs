//! Database models for analytics events.

use crate::types::{EventId, RegistrationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database request for recording an analytics event
#[derive(Debug, Clone)]
pub struct UserEventCreateDBRequest {
    pub session_id: String,
    pub registration_id: Option<RegistrationId>,
    pub event_type: String,
    pub event_name: String,
    pub page_path: Option<String>,
    pub event_data: serde_json::Value,
    pub user_agent: Option<String>,
}

/// Database response for an analytics event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserEventDBResponse {
    pub id: EventId,
    pub session_id: String,
    pub registration_id: Option<RegistrationId>,
    pub event_type: String,
    pub event_name: String,
    pub page_path: Option<String>,
    pub event_data: serde_json::Value,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}
