//! Database repository for pets.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::pets::{PetCreateDBRequest, PetDBResponse},
};
use crate::types::{PetId, RegistrationId};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing pets, newest first
#[derive(Debug, Clone, Default)]
pub struct PetFilter {
    pub registration_id: Option<RegistrationId>,
}

pub struct Pets<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Pets<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Pets<'c> {
    type CreateRequest = PetCreateDBRequest;
    type Response = PetDBResponse;
    type Id = PetId;
    type Filter = PetFilter;

    #[instrument(skip(self, request), fields(registration_id = %request.registration_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let pet = sqlx::query_as::<_, PetDBResponse>(
            r#"
            INSERT INTO pets (registration_id, pet_type, breed, age, name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.registration_id)
        .bind(&request.pet_type)
        .bind(&request.breed)
        .bind(&request.age)
        .bind(&request.name)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(pet)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let pet = sqlx::query_as::<_, PetDBResponse>("SELECT * FROM pets WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(pet)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let pets = sqlx::query_as::<_, PetDBResponse>(
            r#"
            SELECT * FROM pets
            WHERE ($1::uuid IS NULL OR registration_id = $1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(filter.registration_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(pets)
    }

    #[instrument(skip(self), err)]
    async fn delete_all(&mut self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM pets").execute(&mut *self.db).await?;
        Ok(result.rows_affected())
    }
}
