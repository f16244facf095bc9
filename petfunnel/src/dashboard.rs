//! Aggregations behind the admin dashboards.
//!
//! Everything here is a pure function over rows already loaded from the [`Store`](crate::db::Store),
//! so the handlers stay thin and the numbers can be tested without a server.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::analytics::EventType;
use crate::api::models::{
    admin::{EventStats, Overview, PetResponse, QuestionnaireResponse, RegistrationDetails},
    registrations::RegistrationResponse,
};
use crate::db::models::{
    events::UserEventDBResponse, pets::PetDBResponse, questionnaires::QuestionnaireDBResponse,
    registrations::RegistrationDBResponse,
};
use crate::types::RegistrationId;

/// How many of the newest rows the overview shows
pub const LATEST_COUNT: usize = 5;

pub const CSV_HEADER: &str = "Nome,Email,WhatsApp,IP,Data de Cadastro";

/// A registration matches when the query is a case-insensitive substring of its name, email,
/// whatsapp or IP address. An empty query matches everything.
pub fn matches_search(registration: &RegistrationDBResponse, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    [
        Some(registration.full_name.as_str()),
        Some(registration.email.as_str()),
        Some(registration.whatsapp.as_str()),
        registration.ip_address.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&query))
}

/// Join each registration with its pets and its first questionnaire, keeping registration order.
pub fn join_registrations(
    registrations: Vec<RegistrationDBResponse>,
    pets: Vec<PetDBResponse>,
    questionnaires: Vec<QuestionnaireDBResponse>,
) -> Vec<RegistrationDetails> {
    let mut pets_by_registration: HashMap<RegistrationId, Vec<PetResponse>> = HashMap::new();
    for pet in pets {
        pets_by_registration.entry(pet.registration_id).or_default().push(pet.into());
    }

    let mut questionnaire_by_registration: HashMap<RegistrationId, QuestionnaireResponse> = HashMap::new();
    for questionnaire in questionnaires {
        questionnaire_by_registration
            .entry(questionnaire.registration_id)
            .or_insert_with(|| questionnaire.into());
    }

    registrations
        .into_iter()
        .map(|registration| RegistrationDetails {
            pets: pets_by_registration.remove(&registration.id).unwrap_or_default(),
            questionnaire: questionnaire_by_registration.remove(&registration.id),
            registration: registration.into(),
        })
        .collect()
}

/// Headline numbers for the classic dashboard. Inputs are newest first.
pub fn overview(
    registrations: &[RegistrationDBResponse],
    questionnaires: &[QuestionnaireDBResponse],
    pets: &[PetDBResponse],
) -> Overview {
    let (completion_rate, pets_per_registration) = if registrations.is_empty() {
        (0, 0.0)
    } else {
        let total = registrations.len() as f64;
        (
            (questionnaires.len() as f64 / total * 100.0).round() as u32,
            (pets.len() as f64 / total * 10.0).round() / 10.0,
        )
    };

    let unique_ips = registrations
        .iter()
        .filter_map(|r| r.ip_address.as_deref())
        .collect::<HashSet<_>>()
        .len();

    Overview {
        total_registrations: registrations.len(),
        total_questionnaires: questionnaires.len(),
        total_pets: pets.len(),
        completion_rate,
        pets_per_registration,
        unique_ips,
        latest_registrations: registrations.iter().take(LATEST_COUNT).cloned().map(RegistrationResponse::from).collect(),
        latest_pets: pets.iter().take(LATEST_COUNT).cloned().map(PetResponse::from).collect(),
    }
}

/// Totals for the event dashboard
pub fn event_stats(registration_count: usize, events: &[UserEventDBResponse]) -> EventStats {
    let count = |kind: EventType| events.iter().filter(|e| e.event_type == kind.as_str()).count();

    EventStats {
        total_users: registration_count,
        total_events: events.len(),
        page_views: count(EventType::PageView),
        button_clicks: count(EventType::ButtonClick),
        form_submits: count(EventType::FormSubmit),
    }
}

/// `dd/mm/yyyy HH:MM`, in UTC
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%d/%m/%Y %H:%M").to_string()
}

/// Quote a CSV field when it contains a comma, a double quote or a line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Registrations as CSV, one row each after the header.
pub fn registrations_csv(registrations: &[RegistrationDBResponse]) -> String {
    let mut lines = Vec::with_capacity(registrations.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for registration in registrations {
        let row = [
            csv_field(&registration.full_name),
            csv_field(&registration.email),
            csv_field(&registration.whatsapp),
            csv_field(registration.ip_address.as_deref().unwrap_or("N/A")),
            format_date(&registration.created_at),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// `cadastros-YYYY-MM-DD.csv`
pub fn export_file_name(today: &DateTime<Utc>) -> String {
    format!("cadastros-{}.csv", today.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use uuid::Uuid;

    fn registration(name: &str, email: &str, whatsapp: &str, ip: Option<&str>) -> RegistrationDBResponse {
        RegistrationDBResponse {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            email: email.to_string(),
            whatsapp: whatsapp.to_string(),
            ip_address: ip.map(str::to_string),
            selfie_url: None,
            pet_photos: None,
            session_id: None,
            created_at: Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 0).unwrap(),
        }
    }

    fn pet(registration_id: RegistrationId, name: &str) -> PetDBResponse {
        PetDBResponse {
            id: Uuid::new_v4(),
            registration_id,
            pet_type: "cachorro".to_string(),
            breed: "SRD".to_string(),
            age: "filhote".to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    fn questionnaire(registration_id: RegistrationId) -> QuestionnaireDBResponse {
        QuestionnaireDBResponse {
            id: Uuid::new_v4(),
            registration_id,
            quantidade_pets: Some(1),
            alimentacao: None,
            frequencia_alimentacao: None,
            origem: None,
            emergencia_financeira: None,
            vacinas: None,
            castrado: None,
            controle_parasitas: None,
            dificuldade_financeira: None,
            answers: json!({}),
            created_at: Utc::now(),
        }
    }

    fn event(event_type: EventType) -> UserEventDBResponse {
        UserEventDBResponse {
            id: Uuid::new_v4(),
            session_id: "s".to_string(),
            registration_id: None,
            event_type: event_type.as_str().to_string(),
            event_name: "x".to_string(),
            page_path: None,
            event_data: json!({}),
            user_agent: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_search_covers_all_four_fields_case_insensitively() {
        let r = registration("Ana Souza", "Ana@Example.com", "(11) 98765-4321", Some("10.0.0.7"));

        assert!(matches_search(&r, "ana souza"));
        assert!(matches_search(&r, "SOUZA"));
        assert!(matches_search(&r, "example.COM"));
        assert!(matches_search(&r, "98765"));
        assert!(matches_search(&r, "10.0.0"));
        assert!(!matches_search(&r, "maria"));
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let r = registration("Ana Souza", "ana@example.com", "11987654321", None);
        assert!(matches_search(&r, ""));
        assert!(matches_search(&r, "   "));
    }

    #[test]
    fn test_search_without_ip_does_not_match_ip_queries() {
        let r = registration("Ana Souza", "ana@example.com", "11987654321", None);
        assert!(!matches_search(&r, "10.0"));
        assert!(!matches_search(&r, "n/a"));
    }

    #[test]
    fn test_overview_with_no_registrations() {
        let overview = overview(&[], &[], &[]);
        assert_eq!(overview.completion_rate, 0);
        assert_eq!(overview.pets_per_registration, 0.0);
        assert!(overview.latest_registrations.is_empty());
    }

    #[test]
    fn test_overview_rates_and_latest() {
        let registrations: Vec<_> = (0..7)
            .map(|i| registration(&format!("Pessoa {i}"), &format!("p{i}@example.com"), "11987654321", Some(if i % 2 == 0 { "1.1.1.1" } else { "2.2.2.2" })))
            .collect();
        let questionnaires = vec![questionnaire(registrations[0].id), questionnaire(registrations[1].id)];
        let pets = vec![
            pet(registrations[0].id, "Rex"),
            pet(registrations[1].id, "Mia"),
            pet(registrations[2].id, "Bob"),
        ];

        let overview = overview(&registrations, &questionnaires, &pets);

        assert_eq!(overview.total_registrations, 7);
        // 2 / 7 = 28.57%
        assert_eq!(overview.completion_rate, 29);
        // 3 / 7 = 0.428...
        assert_eq!(overview.pets_per_registration, 0.4);
        assert_eq!(overview.unique_ips, 2);
        assert_eq!(overview.latest_registrations.len(), LATEST_COUNT);
        assert_eq!(overview.latest_registrations[0].id, registrations[0].id);
        assert_eq!(overview.latest_pets.len(), 3);
    }

    #[test]
    fn test_join_takes_first_questionnaire_and_all_pets() {
        let a = registration("Ana Souza", "ana@example.com", "11987654321", None);
        let b = registration("Bia Lima", "bia@example.com", "11987654321", None);
        let first = questionnaire(a.id);
        let first_id = first.id;

        let joined = join_registrations(
            vec![a.clone(), b.clone()],
            vec![pet(a.id, "Rex"), pet(a.id, "Mia")],
            vec![first, questionnaire(a.id)],
        );

        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].registration.id, a.id);
        assert_eq!(joined[0].pets.len(), 2);
        assert_eq!(joined[0].questionnaire.as_ref().map(|q| q.id), Some(first_id));
        assert!(joined[1].pets.is_empty());
        assert!(joined[1].questionnaire.is_none());
    }

    #[test]
    fn test_event_stats_counts_by_type() {
        let events = vec![
            event(EventType::PageView),
            event(EventType::PageView),
            event(EventType::ButtonClick),
            event(EventType::FormSubmit),
            event(EventType::FormError),
        ];

        assert_eq!(
            event_stats(3, &events),
            EventStats {
                total_users: 3,
                total_events: 5,
                page_views: 2,
                button_clicks: 1,
                form_submits: 1,
            }
        );
    }

    #[test]
    fn test_csv_quotes_and_placeholders() {
        let rows = vec![
            registration("Souza, Ana", "ana@example.com", "(11) 98765-4321", None),
            registration("Ana \"Nina\" Lima", "nina@example.com", "(11) 3456-7890", Some("10.0.0.1")),
        ];

        let csv = registrations_csv(&rows);
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "\"Souza, Ana\",ana@example.com,(11) 98765-4321,N/A,07/03/2025 09:05");
        assert_eq!(lines[2], "\"Ana \"\"Nina\"\" Lima\",nina@example.com,(11) 3456-7890,10.0.0.1,07/03/2025 09:05");
    }

    #[test]
    fn test_export_file_name() {
        let day = Utc.with_ymd_and_hms(2025, 12, 1, 23, 59, 0).unwrap();
        assert_eq!(export_file_name(&day), "cadastros-2025-12-01.csv");
    }
}
