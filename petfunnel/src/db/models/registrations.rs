//! Database models for registrations.

use crate::types::RegistrationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database request for creating a new registration
#[derive(Debug, Clone)]
pub struct RegistrationCreateDBRequest {
    pub full_name: String,
    pub email: String,
    pub whatsapp: String,
    pub ip_address: Option<String>,
    pub selfie_url: Option<String>,
    pub pet_photos: Option<Vec<String>>,
    pub session_id: Option<String>,
}

/// Database response for a registration
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RegistrationDBResponse {
    pub id: RegistrationId,
    pub full_name: String,
    pub email: String,
    pub whatsapp: String,
    pub ip_address: Option<String>,
    pub selfie_url: Option<String>,
    pub pet_photos: Option<Vec<String>>,
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
