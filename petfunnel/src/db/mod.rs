//! Data persistence and access.
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │  Arc<dyn Store>
//!        ↓
//! ┌─────────────┐        ┌──────────────┐
//! │   PgStore   │        │ MemoryStore  │
//! └──────┬──────┘        └──────────────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - one per table)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations over a postgres connection
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//! - [`postgres`]: [`Store`] backed by a connection pool
//! - [`memory`]: [`Store`] held in process memory, for development and tests
//!
//! Handlers only ever see the [`Store`] trait. Both implementations report constraint failures as
//! the same [`errors::DbError`] variants, so a duplicate email looks identical whichever backend
//! is configured.

pub mod errors;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod postgres;

use crate::types::RegistrationId;
use errors::Result;
use models::{
    events::{UserEventCreateDBRequest, UserEventDBResponse},
    pets::{PetCreateDBRequest, PetDBResponse},
    questionnaires::{QuestionnaireCreateDBRequest, QuestionnaireDBResponse},
    registrations::{RegistrationCreateDBRequest, RegistrationDBResponse},
};
use serde::Serialize;
use utoipa::ToSchema;

pub use handlers::{PetFilter, QuestionnaireFilter, RegistrationFilter, UserEventFilter};
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Row counts removed by [`Store::clear_all`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ClearSummary {
    pub pets: u64,
    pub questionnaires: u64,
    pub events: u64,
    pub registrations: u64,
}

/// Storage for the four funnel collections.
///
/// Lists are newest first unless a filter says otherwise.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn create_registration(&self, request: &RegistrationCreateDBRequest) -> Result<RegistrationDBResponse>;

    async fn get_registration(&self, id: RegistrationId) -> Result<Option<RegistrationDBResponse>>;

    async fn list_registrations(&self, filter: &RegistrationFilter) -> Result<Vec<RegistrationDBResponse>>;

    async fn create_questionnaire(&self, request: &QuestionnaireCreateDBRequest) -> Result<QuestionnaireDBResponse>;

    async fn list_questionnaires(&self, filter: &QuestionnaireFilter) -> Result<Vec<QuestionnaireDBResponse>>;

    async fn create_pet(&self, request: &PetCreateDBRequest) -> Result<PetDBResponse>;

    async fn list_pets(&self, filter: &PetFilter) -> Result<Vec<PetDBResponse>>;

    async fn create_event(&self, request: &UserEventCreateDBRequest) -> Result<UserEventDBResponse>;

    async fn list_events(&self, filter: &UserEventFilter) -> Result<Vec<UserEventDBResponse>>;

    /// Delete every row, children before parents: pets, questionnaires, events, registrations
    async fn clear_all(&self) -> Result<ClearSummary>;
}
