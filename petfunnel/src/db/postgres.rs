//! [`Store`] over a postgres pool, delegating to the per-table repositories.

use super::{
    ClearSummary, Store,
    errors::Result,
    handlers::{
        PetFilter, Pets, QuestionnaireFilter, Questionnaires, RegistrationFilter, Registrations, Repository, UserEventFilter,
        UserEvents,
    },
    models::{
        events::{UserEventCreateDBRequest, UserEventDBResponse},
        pets::{PetCreateDBRequest, PetDBResponse},
        questionnaires::{QuestionnaireCreateDBRequest, QuestionnaireDBResponse},
        registrations::{RegistrationCreateDBRequest, RegistrationDBResponse},
    },
};
use crate::types::RegistrationId;
use sqlx::PgPool;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn create_registration(&self, request: &RegistrationCreateDBRequest) -> Result<RegistrationDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Registrations::new(&mut conn).create(request).await
    }

    async fn get_registration(&self, id: RegistrationId) -> Result<Option<RegistrationDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Registrations::new(&mut conn).get_by_id(id).await
    }

    async fn list_registrations(&self, filter: &RegistrationFilter) -> Result<Vec<RegistrationDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Registrations::new(&mut conn).list(filter).await
    }

    async fn create_questionnaire(&self, request: &QuestionnaireCreateDBRequest) -> Result<QuestionnaireDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Questionnaires::new(&mut conn).create(request).await
    }

    async fn list_questionnaires(&self, filter: &QuestionnaireFilter) -> Result<Vec<QuestionnaireDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Questionnaires::new(&mut conn).list(filter).await
    }

    async fn create_pet(&self, request: &PetCreateDBRequest) -> Result<PetDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Pets::new(&mut conn).create(request).await
    }

    async fn list_pets(&self, filter: &PetFilter) -> Result<Vec<PetDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Pets::new(&mut conn).list(filter).await
    }

    async fn create_event(&self, request: &UserEventCreateDBRequest) -> Result<UserEventDBResponse> {
        let mut conn = self.pool.acquire().await?;
        UserEvents::new(&mut conn).create(request).await
    }

    async fn list_events(&self, filter: &UserEventFilter) -> Result<Vec<UserEventDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        UserEvents::new(&mut conn).list(filter).await
    }

    #[instrument(skip(self), err)]
    async fn clear_all(&self) -> Result<ClearSummary> {
        let mut tx = self.pool.begin().await?;

        let pets = Pets::new(&mut tx).delete_all().await?;
        let questionnaires = Questionnaires::new(&mut tx).delete_all().await?;
        let events = UserEvents::new(&mut tx).delete_all().await?;
        let registrations = Registrations::new(&mut tx).delete_all().await?;

        tx.commit().await?;

        let summary = ClearSummary {
            pets,
            questionnaires,
            events,
            registrations,
        };
        info!(?summary, "Cleared all funnel data");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;

    fn registration(email: &str) -> RegistrationCreateDBRequest {
        RegistrationCreateDBRequest {
            full_name: "Ana Souza".to_string(),
            email: email.to_string(),
            whatsapp: "(11) 98765-4321".to_string(),
            ip_address: Some("203.0.113.7".to_string()),
            selfie_url: None,
            pet_photos: None,
            session_id: Some("session-1".to_string()),
        }
    }

    #[sqlx::test]
    #[ignore = "requires a postgres database (DATABASE_URL)"]
    async fn test_duplicate_email_is_reported_as_duplicate(pool: PgPool) {
        let store = PgStore::new(pool);
        store.create_registration(&registration("ana@example.com")).await.unwrap();

        let err = store.create_registration(&registration("ana@example.com")).await.unwrap_err();
        assert!(err.is_duplicate_email(), "unexpected error: {err:?}");
    }

    #[sqlx::test]
    #[ignore = "requires a postgres database (DATABASE_URL)"]
    async fn test_child_rows_require_registration(pool: PgPool) {
        let store = PgStore::new(pool);
        let err = store
            .create_pet(&PetCreateDBRequest {
                registration_id: uuid::Uuid::new_v4(),
                pet_type: "gato".to_string(),
                breed: "SRD".to_string(),
                age: "adulto".to_string(),
                name: "Mingau".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[sqlx::test]
    #[ignore = "requires a postgres database (DATABASE_URL)"]
    async fn test_clear_all_deletes_children_first(pool: PgPool) {
        let store = PgStore::new(pool);
        let reg = store.create_registration(&registration("bia@example.com")).await.unwrap();
        store
            .create_pet(&PetCreateDBRequest {
                registration_id: reg.id,
                pet_type: "cachorro".to_string(),
                breed: "Vira-lata".to_string(),
                age: "filhote".to_string(),
                name: "Rex".to_string(),
            })
            .await
            .unwrap();
        store
            .create_event(&UserEventCreateDBRequest {
                session_id: "session-1".to_string(),
                registration_id: Some(reg.id),
                event_type: "page_view".to_string(),
                event_name: "view_questionario".to_string(),
                page_path: Some("/questionario".to_string()),
                event_data: serde_json::json!({}),
                user_agent: None,
            })
            .await
            .unwrap();

        let summary = store.clear_all().await.unwrap();
        assert_eq!(
            summary,
            ClearSummary {
                pets: 1,
                questionnaires: 0,
                events: 1,
                registrations: 1
            }
        );
        assert!(store.list_registrations(&RegistrationFilter::default()).await.unwrap().is_empty());
    }
}
