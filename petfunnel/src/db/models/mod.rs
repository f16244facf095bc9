//! Database record structures.
//!
//! Each submodule holds the `*CreateDBRequest` used to insert a row and the `*DBResponse` read back
//! from the table. Rows are never updated in place, so there are no update request types.

pub mod events;
pub mod pets;
pub mod questionnaires;
pub mod registrations;
