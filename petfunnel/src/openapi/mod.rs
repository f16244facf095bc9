//! OpenAPI documentation for the public funnel API and the admin API.
//!
//! The document is served at `/api-docs/openapi.json` and rendered with Scalar at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::{analytics, api, auth, db, questionnaire};

struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "SessionCookie".to_string(),
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "petfunnel_admin_session",
                    "Set by `POST /admin/api/login`. The cookie name is configurable with `session.cookie_name`.",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "petfunnel",
        description = "Pet-care survey: registration, questionnaire dialog, optional PIX donation, analytics and admin dashboards."
    ),
    modifiers(&SessionCookieAddon),
    paths(
        api::handlers::landing::get_landing,
        api::handlers::registrations::create_registration,
        api::handlers::questionnaire::start_questionnaire,
        api::handlers::questionnaire::get_questionnaire,
        api::handlers::questionnaire::answer_questionnaire,
        api::handlers::payments::create_pix,
        api::handlers::payments::pix_copied,
        api::handlers::events::track_event,
        api::handlers::admin::login,
        api::handlers::admin::logout,
        api::handlers::admin::me,
        api::handlers::admin::overview,
        api::handlers::admin::list_registrations,
        api::handlers::admin::export_registrations,
        api::handlers::admin::list_pets,
        api::handlers::admin::list_questionnaires,
        api::handlers::admin::clear_database,
        api::handlers::admin::event_stats,
        api::handlers::admin::user_journey,
    ),
    components(
        schemas(
            api::models::landing::LandingContent,
            api::models::landing::LandingFeature,
            api::models::registrations::RegistrationCreate,
            api::models::registrations::RegistrationCreated,
            api::models::registrations::RegistrationResponse,
            api::models::questionnaire::QuestionnaireStart,
            api::models::questionnaire::AnswerRequest,
            api::models::questionnaire::ChoiceView,
            api::models::questionnaire::StepView,
            api::models::questionnaire::QuestionnaireState,
            api::models::payments::PixRequest,
            api::models::payments::PixResponse,
            api::models::payments::PixCopiedRequest,
            api::models::events::TrackEventRequest,
            api::models::events::TrackEventResponse,
            api::models::events::UserEventResponse,
            api::models::admin::LoginRequest,
            api::models::admin::LoginResponse,
            api::models::admin::PetResponse,
            api::models::admin::QuestionnaireResponse,
            api::models::admin::Overview,
            api::models::admin::RegistrationDetails,
            api::models::admin::ClearRequest,
            api::models::admin::ClearResponse,
            api::models::admin::EventStats,
            api::models::admin::UserJourney,
            analytics::EventType,
            auth::current_admin::CurrentAdmin,
            db::ClearSummary,
            questionnaire::Step,
            questionnaire::Presentation,
            questionnaire::session::Speaker,
            questionnaire::session::TranscriptEntry,
        )
    ),
    tags(
        (name = "landing", description = "Public landing page"),
        (name = "registrations", description = "Registration form"),
        (name = "questionnaire", description = "Step-by-step questionnaire dialog"),
        (name = "payments", description = "Optional PIX donation"),
        (name = "events", description = "Client analytics events"),
        (name = "admin", description = "Admin login and dashboards"),
    )
)]
pub struct ApiDoc;
