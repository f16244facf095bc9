//! API request/response models for analytics events.

use crate::analytics::EventType;
use crate::db::models::events::UserEventDBResponse;
use crate::types::{EventId, RegistrationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An event reported by the client
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrackEventRequest {
    /// Omit on first contact; the response carries the session id to use from then on
    pub session_id: Option<String>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub registration_id: Option<RegistrationId>,
    pub event_type: EventType,
    pub event_name: String,
    pub page_path: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub event_data: Option<serde_json::Value>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub referrer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrackEventResponse {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserEventResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: EventId,
    pub session_id: String,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub registration_id: Option<RegistrationId>,
    pub event_type: String,
    pub event_name: String,
    pub page_path: Option<String>,
    #[schema(value_type = Object)]
    pub event_data: serde_json::Value,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserEventDBResponse> for UserEventResponse {
    fn from(db: UserEventDBResponse) -> Self {
        Self {
            id: db.id,
            session_id: db.session_id,
            registration_id: db.registration_id,
            event_type: db.event_type,
            event_name: db.event_name,
            page_path: db.page_path,
            event_data: db.event_data,
            user_agent: db.user_agent,
            created_at: db.created_at,
        }
    }
}
