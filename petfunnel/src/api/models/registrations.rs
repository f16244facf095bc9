//! API request/response models for registrations.

use crate::db::models::registrations::RegistrationDBResponse;
use crate::types::RegistrationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The registration form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationCreate {
    pub full_name: String,
    pub email: String,
    pub whatsapp: String,
    /// Analytics session of the browser submitting the form
    pub session_id: Option<String>,
}

/// Returned after a successful registration
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationCreated {
    #[schema(value_type = String, format = "uuid")]
    pub id: RegistrationId,
    /// Where the client goes next
    pub redirect_to: String,
    /// How long the client waits before going there
    pub redirect_after_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationResponse {
    #[schema(value_type = String, format = "uuid")]
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

impl From<RegistrationDBResponse> for RegistrationResponse {
    fn from(db: RegistrationDBResponse) -> Self {
        Self {
            id: db.id,
            full_name: db.full_name,
            email: db.email,
            whatsapp: db.whatsapp,
            ip_address: db.ip_address,
            selfie_url: db.selfie_url,
            pet_photos: db.pet_photos,
            session_id: db.session_id,
            created_at: db.created_at,
        }
    }
}
