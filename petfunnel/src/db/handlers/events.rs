//! Database repository for analytics events.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::events::{UserEventCreateDBRequest, UserEventDBResponse},
};
use crate::types::{EventId, RegistrationId};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing events.
///
/// When either `session_id` or `registration_id` is set, an event matches if it has that session
/// id *or* that registration id: events recorded before signup only carry the session.
#[derive(Debug, Clone, Default)]
pub struct UserEventFilter {
    pub session_id: Option<String>,
    pub registration_id: Option<RegistrationId>,
    pub oldest_first: bool,
}

pub struct UserEvents<'c> {
    db: &'c mut PgConnection,
}

impl<'c> UserEvents<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for UserEvents<'c> {
    type CreateRequest = UserEventCreateDBRequest;
    type Response = UserEventDBResponse;
    type Id = EventId;
    type Filter = UserEventFilter;

    #[instrument(skip(self, request), fields(event_name = %request.event_name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let event = sqlx::query_as::<_, UserEventDBResponse>(
            r#"
            INSERT INTO user_events (session_id, registration_id, event_type, event_name, page_path, event_data, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&request.session_id)
        .bind(request.registration_id)
        .bind(&request.event_type)
        .bind(&request.event_name)
        .bind(&request.page_path)
        .bind(&request.event_data)
        .bind(&request.user_agent)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(event)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let event = sqlx::query_as::<_, UserEventDBResponse>("SELECT * FROM user_events WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(event)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let order = if filter.oldest_first { "ASC" } else { "DESC" };
        let query = format!(
            r#"
            SELECT * FROM user_events
            WHERE ($1::text IS NULL AND $2::uuid IS NULL)
               OR session_id = $1
               OR registration_id = $2
            ORDER BY created_at {order}, id {order}
            "#
        );

        let events = sqlx::query_as::<_, UserEventDBResponse>(&query)
            .bind(&filter.session_id)
            .bind(filter.registration_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(events)
    }

    #[instrument(skip(self), err)]
    async fn delete_all(&mut self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM user_events").execute(&mut *self.db).await?;
        Ok(result.rows_affected())
    }
}
