//! Common type definitions.
//!
//! All persisted entities are keyed by UUIDs wrapped in type aliases:
//!
//! - [`RegistrationId`]: Registration (contact details) identifier
//! - [`QuestionnaireId`]: Stored questionnaire answers identifier
//! - [`PetId`]: Pet identifier
//! - [`EventId`]: Analytics event identifier
//!
//! Analytics session ids are generated by the client (or by us on first contact) and are kept as
//! plain strings, since nothing but equality is ever asked of them.

use uuid::Uuid;

pub type RegistrationId = Uuid;
pub type QuestionnaireId = Uuid;
pub type PetId = Uuid;
pub type EventId = Uuid;

/// Abbreviate a UUID to its first 8 characters for logging
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbrev_uuid() {
        let id = Uuid::parse_str("3f2b8c1e-0000-4000-8000-000000000000").unwrap();
        assert_eq!(abbrev_uuid(&id), "3f2b8c1e");
    }
}
