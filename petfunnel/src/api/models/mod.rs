//! API request and response data models.
//!
//! API models are kept apart from the database models so the wire format can evolve
//! independently of the tables. Everything here is annotated with `utoipa` for the generated docs.
//!
//! - [`registrations`]: Registration form payloads
//! - [`questionnaire`]: Dialog sessions, steps and transcripts
//! - [`payments`]: PIX charge requests and results
//! - [`events`]: Analytics events posted by clients
//! - [`admin`]: Dashboard login, aggregates and joined views
//! - [`landing`]: Public landing page content

pub mod admin;
pub mod events;
pub mod landing;
pub mod payments;
pub mod questionnaire;
pub mod registrations;
