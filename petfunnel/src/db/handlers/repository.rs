//! Base repository trait for database operations.
//!
//! A repository is a data access layer for one postgres table. Each repository wraps a
//! connection (or transaction) and is generic over its request/response types, which implement
//! `sqlx::FromRow` on the response side.

use crate::db::errors::Result;

/// Base repository trait providing the operations the funnel needs
///
/// Rows are created once and never updated, so there is no update operation; deletion is only
/// ever the bulk "clear everything" action.
#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest: Sync;

    /// The response/DTO type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Create a new entity
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// Get an entity by ID
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// List entities with filtering
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;

    /// Delete every row in the table, returning how many were removed
    async fn delete_all(&mut self) -> Result<u64>;
}
