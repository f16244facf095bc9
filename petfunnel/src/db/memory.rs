//! [`Store`] held in process memory.
//!
//! Used for local development (`database.type: memory`) and by the test suite. It enforces the
//! same constraints the postgres schema does (unique email, child rows referencing an existing
//! registration) and reports them with the same [`DbError`] variants.

use super::{
    ClearSummary, PetFilter, QuestionnaireFilter, RegistrationFilter, Store, UserEventFilter,
    errors::{DbError, Result},
    models::{
        events::{UserEventCreateDBRequest, UserEventDBResponse},
        pets::{PetCreateDBRequest, PetDBResponse},
        questionnaires::{QuestionnaireCreateDBRequest, QuestionnaireDBResponse},
        registrations::{RegistrationCreateDBRequest, RegistrationDBResponse},
    },
};
use crate::types::RegistrationId;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    // Each table is kept in insertion order, so reversing gives newest first
    registrations: Vec<RegistrationDBResponse>,
    questionnaires: Vec<QuestionnaireDBResponse>,
    pets: Vec<PetDBResponse>,
    events: Vec<UserEventDBResponse>,
}

impl Tables {
    fn require_registration(&self, id: RegistrationId, table: &str) -> Result<()> {
        if self.registrations.iter().any(|r| r.id == id) {
            Ok(())
        } else {
            Err(DbError::ForeignKeyViolation {
                constraint: Some(format!("{table}_registration_id_fkey")),
                table: Some(table.to_string()),
                message: format!("registration {id} does not exist"),
            })
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn create_registration(&self, request: &RegistrationCreateDBRequest) -> Result<RegistrationDBResponse> {
        let mut tables = self.tables.write().await;

        if tables.registrations.iter().any(|r| r.email == request.email) {
            return Err(DbError::UniqueViolation {
                constraint: Some("registrations_email_key".to_string()),
                table: Some("registrations".to_string()),
                message: format!("duplicate key value violates unique constraint: email {}", request.email),
            });
        }

        let registration = RegistrationDBResponse {
            id: Uuid::new_v4(),
            full_name: request.full_name.clone(),
            email: request.email.clone(),
            whatsapp: request.whatsapp.clone(),
            ip_address: request.ip_address.clone(),
            selfie_url: request.selfie_url.clone(),
            pet_photos: request.pet_photos.clone(),
            session_id: request.session_id.clone(),
            created_at: Utc::now(),
        };
        tables.registrations.push(registration.clone());
        Ok(registration)
    }

    async fn get_registration(&self, id: RegistrationId) -> Result<Option<RegistrationDBResponse>> {
        let tables = self.tables.read().await;
        Ok(tables.registrations.iter().find(|r| r.id == id).cloned())
    }

    async fn list_registrations(&self, filter: &RegistrationFilter) -> Result<Vec<RegistrationDBResponse>> {
        let tables = self.tables.read().await;
        let limit = filter.limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(0));
        Ok(tables.registrations.iter().rev().take(limit).cloned().collect())
    }

    async fn create_questionnaire(&self, request: &QuestionnaireCreateDBRequest) -> Result<QuestionnaireDBResponse> {
        let mut tables = self.tables.write().await;
        tables.require_registration(request.registration_id, "pet_questionnaire")?;

        let questionnaire = QuestionnaireDBResponse {
            id: Uuid::new_v4(),
            registration_id: request.registration_id,
            quantidade_pets: request.quantidade_pets,
            alimentacao: request.alimentacao.clone(),
            frequencia_alimentacao: request.frequencia_alimentacao.clone(),
            origem: request.origem.clone(),
            emergencia_financeira: request.emergencia_financeira.clone(),
            vacinas: request.vacinas.clone(),
            castrado: request.castrado.clone(),
            controle_parasitas: request.controle_parasitas.clone(),
            dificuldade_financeira: request.dificuldade_financeira.clone(),
            answers: request.answers.clone(),
            created_at: Utc::now(),
        };
        tables.questionnaires.push(questionnaire.clone());
        Ok(questionnaire)
    }

    async fn list_questionnaires(&self, filter: &QuestionnaireFilter) -> Result<Vec<QuestionnaireDBResponse>> {
        let tables = self.tables.read().await;
        Ok(tables
            .questionnaires
            .iter()
            .rev()
            .filter(|q| filter.registration_id.is_none_or(|id| q.registration_id == id))
            .cloned()
            .collect())
    }

    async fn create_pet(&self, request: &PetCreateDBRequest) -> Result<PetDBResponse> {
        let mut tables = self.tables.write().await;
        tables.require_registration(request.registration_id, "pets")?;

        let pet = PetDBResponse {
            id: Uuid::new_v4(),
            registration_id: request.registration_id,
            pet_type: request.pet_type.clone(),
            breed: request.breed.clone(),
            age: request.age.clone(),
            name: request.name.clone(),
            created_at: Utc::now(),
        };
        tables.pets.push(pet.clone());
        Ok(pet)
    }

    async fn list_pets(&self, filter: &PetFilter) -> Result<Vec<PetDBResponse>> {
        let tables = self.tables.read().await;
        Ok(tables
            .pets
            .iter()
            .rev()
            .filter(|p| filter.registration_id.is_none_or(|id| p.registration_id == id))
            .cloned()
            .collect())
    }

    async fn create_event(&self, request: &UserEventCreateDBRequest) -> Result<UserEventDBResponse> {
        let mut tables = self.tables.write().await;
        if let Some(registration_id) = request.registration_id {
            tables.require_registration(registration_id, "user_events")?;
        }

        let event = UserEventDBResponse {
            id: Uuid::new_v4(),
            session_id: request.session_id.clone(),
            registration_id: request.registration_id,
            event_type: request.event_type.clone(),
            event_name: request.event_name.clone(),
            page_path: request.page_path.clone(),
            event_data: request.event_data.clone(),
            user_agent: request.user_agent.clone(),
            created_at: Utc::now(),
        };
        tables.events.push(event.clone());
        Ok(event)
    }

    async fn list_events(&self, filter: &UserEventFilter) -> Result<Vec<UserEventDBResponse>> {
        let tables = self.tables.read().await;
        let unfiltered = filter.session_id.is_none() && filter.registration_id.is_none();
        let matches = |e: &&UserEventDBResponse| {
            unfiltered
                || filter.session_id.as_deref().is_some_and(|s| e.session_id == s)
                || filter.registration_id.is_some_and(|id| e.registration_id == Some(id))
        };

        let events: Vec<_> = if filter.oldest_first {
            tables.events.iter().filter(matches).cloned().collect()
        } else {
            tables.events.iter().rev().filter(matches).cloned().collect()
        };
        Ok(events)
    }

    async fn clear_all(&self) -> Result<ClearSummary> {
        let mut tables = self.tables.write().await;
        let summary = ClearSummary {
            pets: tables.pets.drain(..).count() as u64,
            questionnaires: tables.questionnaires.drain(..).count() as u64,
            events: tables.events.drain(..).count() as u64,
            registrations: tables.registrations.drain(..).count() as u64,
        };
        Ok(summary)
    }
}
