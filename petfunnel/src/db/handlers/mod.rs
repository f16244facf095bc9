//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection or transaction and implements [`Repository`]:
//!
//! - [`Registrations`]: Contact details captured by the registration form
//! - [`Questionnaires`]: Answers stored when the questionnaire completes
//! - [`Pets`]: Pets described during the questionnaire
//! - [`UserEvents`]: Analytics events
//!
//! ```ignore
//! use petfunnel::db::handlers::{Registrations, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = Registrations::new(&mut conn);
//!     let newest = repo.list(&RegistrationFilter::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod events;
pub mod pets;
pub mod questionnaires;
pub mod registrations;
pub mod repository;

pub use events::{UserEventFilter, UserEvents};
pub use pets::{PetFilter, Pets};
pub use questionnaires::{QuestionnaireFilter, Questionnaires};
pub use registrations::{RegistrationFilter, Registrations};
pub use repository::Repository;
