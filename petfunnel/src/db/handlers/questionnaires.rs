//! Database repository for stored questionnaire answers.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::questionnaires::{QuestionnaireCreateDBRequest, QuestionnaireDBResponse},
};
use crate::types::{QuestionnaireId, RegistrationId};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing questionnaires, newest first
#[derive(Debug, Clone, Default)]
pub struct QuestionnaireFilter {
    pub registration_id: Option<RegistrationId>,
}

pub struct Questionnaires<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Questionnaires<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Questionnaires<'c> {
    type CreateRequest = QuestionnaireCreateDBRequest;
    type Response = QuestionnaireDBResponse;
    type Id = QuestionnaireId;
    type Filter = QuestionnaireFilter;

    #[instrument(skip(self, request), fields(registration_id = %request.registration_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let questionnaire = sqlx::query_as::<_, QuestionnaireDBResponse>(
            r#"
            INSERT INTO pet_questionnaire (
                registration_id, quantidade_pets, alimentacao, frequencia_alimentacao, origem,
                emergencia_financeira, vacinas, castrado, controle_parasitas, dificuldade_financeira, answers
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(request.registration_id)
        .bind(request.quantidade_pets)
        .bind(&request.alimentacao)
        .bind(&request.frequencia_alimentacao)
        .bind(&request.origem)
        .bind(&request.emergencia_financeira)
        .bind(&request.vacinas)
        .bind(&request.castrado)
        .bind(&request.controle_parasitas)
        .bind(&request.dificuldade_financeira)
        .bind(&request.answers)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(questionnaire)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let questionnaire = sqlx::query_as::<_, QuestionnaireDBResponse>("SELECT * FROM pet_questionnaire WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(questionnaire)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let questionnaires = sqlx::query_as::<_, QuestionnaireDBResponse>(
            r#"
            SELECT * FROM pet_questionnaire
            WHERE ($1::uuid IS NULL OR registration_id = $1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(filter.registration_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(questionnaires)
    }

    #[instrument(skip(self), err)]
    async fn delete_all(&mut self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM pet_questionnaire").execute(&mut *self.db).await?;
        Ok(result.rows_affected())
    }
}
