//! API request/response models for the admin dashboards.

use super::events::UserEventResponse;
use super::registrations::RegistrationResponse;
use crate::db::models::{pets::PetDBResponse, questionnaires::QuestionnaireDBResponse};
use crate::types::{PetId, QuestionnaireId, RegistrationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Typed confirmation required before everything is deleted
pub const CLEAR_CONFIRMATION: &str = "EXCLUIR TUDO";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PetResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: PetId,
    #[schema(value_type = String, format = "uuid")]
    pub registration_id: RegistrationId,
    pub pet_type: String,
    pub breed: String,
    pub age: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<PetDBResponse> for PetResponse {
    fn from(db: PetDBResponse) -> Self {
        Self {
            id: db.id,
            registration_id: db.registration_id,
            pet_type: db.pet_type,
            breed: db.breed,
            age: db.age,
            name: db.name,
            created_at: db.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionnaireResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: QuestionnaireId,
    #[schema(value_type = String, format = "uuid")]
    pub registration_id: RegistrationId,
    pub quantidade_pets: Option<i32>,
    pub alimentacao: Option<String>,
    pub frequencia_alimentacao: Option<String>,
    pub origem: Option<String>,
    pub emergencia_financeira: Option<String>,
    pub vacinas: Option<String>,
    pub castrado: Option<String>,
    pub controle_parasitas: Option<String>,
    pub dificuldade_financeira: Option<String>,
    /// Every answer, keyed by step
    #[schema(value_type = Object)]
    pub answers: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<QuestionnaireDBResponse> for QuestionnaireResponse {
    fn from(db: QuestionnaireDBResponse) -> Self {
        Self {
            id: db.id,
            registration_id: db.registration_id,
            quantidade_pets: db.quantidade_pets,
            alimentacao: db.alimentacao,
            frequencia_alimentacao: db.frequencia_alimentacao,
            origem: db.origem,
            emergencia_financeira: db.emergencia_financeira,
            vacinas: db.vacinas,
            castrado: db.castrado,
            controle_parasitas: db.controle_parasitas,
            dificuldade_financeira: db.dificuldade_financeira,
            answers: db.answers,
            created_at: db.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Overview {
    pub total_registrations: usize,
    pub total_questionnaires: usize,
    pub total_pets: usize,
    /// Percentage of registrations that finished the questionnaire, rounded
    pub completion_rate: u32,
    /// Rounded to one decimal place
    pub pets_per_registration: f64,
    /// Distinct known IP addresses among registrations
    pub unique_ips: usize,
    pub latest_registrations: Vec<RegistrationResponse>,
    pub latest_pets: Vec<PetResponse>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RegistrationSearch {
    /// Case-insensitive substring of name, email, whatsapp or IP address
    pub search: Option<String>,
}

/// A registration with everything collected about it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegistrationDetails {
    #[serde(flatten)]
    pub registration: RegistrationResponse,
    pub pets: Vec<PetResponse>,
    pub questionnaire: Option<QuestionnaireResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClearRequest {
    /// Must equal `EXCLUIR TUDO`
    pub confirm: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClearResponse {
    pub message: String,
    pub deleted: crate::db::ClearSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventStats {
    pub total_users: usize,
    pub total_events: usize,
    pub page_views: usize,
    pub button_clicks: usize,
    pub form_submits: usize,
}

/// A registration and its full event history
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserJourney {
    #[serde(flatten)]
    pub registration: RegistrationResponse,
    /// Oldest first
    pub events: Vec<UserEventResponse>,
    pub pets: Vec<PetResponse>,
    pub questionnaire: Option<QuestionnaireResponse>,
}
