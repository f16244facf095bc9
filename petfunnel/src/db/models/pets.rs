//! Database models for pets.

use crate::types::{PetId, RegistrationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct PetCreateDBRequest {
    pub registration_id: RegistrationId,
    pub pet_type: String,
    pub breed: String,
    pub age: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PetDBResponse {
    pub id: PetId,
    pub registration_id: RegistrationId,
    pub pet_type: String,
    pub breed: String,
    pub age: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
