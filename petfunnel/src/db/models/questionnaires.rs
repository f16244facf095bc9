//! Database models for stored questionnaire answers.

use crate::types::{QuestionnaireId, RegistrationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database request for storing a completed questionnaire
///
/// `answers` carries the full step-keyed answer map; the typed columns are filled for the steps
/// that map onto one.
#[derive(Debug, Clone, Default)]
pub struct QuestionnaireCreateDBRequest {
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
    pub answers: serde_json::Value,
}

/// Database response for a stored questionnaire
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionnaireDBResponse {
    pub id: QuestionnaireId,
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
    pub answers: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
