//! Database repository for registrations.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::registrations::{RegistrationCreateDBRequest, RegistrationDBResponse},
};
use crate::types::{RegistrationId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing registrations, newest first
#[derive(Debug, Clone, Default)]
pub struct RegistrationFilter {
    pub limit: Option<i64>,
}

pub struct Registrations<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Registrations<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Registrations<'c> {
    type CreateRequest = RegistrationCreateDBRequest;
    type Response = RegistrationDBResponse;
    type Id = RegistrationId;
    type Filter = RegistrationFilter;

    #[instrument(skip(self, request), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let registration = sqlx::query_as::<_, RegistrationDBResponse>(
            r#"
            INSERT INTO registrations (full_name, email, whatsapp, ip_address, selfie_url, pet_photos, session_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&request.full_name)
        .bind(&request.email)
        .bind(&request.whatsapp)
        .bind(&request.ip_address)
        .bind(&request.selfie_url)
        .bind(&request.pet_photos)
        .bind(&request.session_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(registration)
    }

    #[instrument(skip(self), fields(registration_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let registration = sqlx::query_as::<_, RegistrationDBResponse>("SELECT * FROM registrations WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(registration)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let registrations = sqlx::query_as::<_, RegistrationDBResponse>(
            "SELECT * FROM registrations ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(filter.limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(registrations)
    }

    #[instrument(skip(self), err)]
    async fn delete_all(&mut self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM registrations").execute(&mut *self.db).await?;
        Ok(result.rows_affected())
    }
}
