use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{error, info};

use super::{client_ip, session_or_new, user_agent};
use crate::{
    AppState,
    analytics::{Event, EventContext},
    api::models::registrations::{RegistrationCreate, RegistrationCreated},
    db::models::registrations::RegistrationCreateDBRequest,
    errors::{DUPLICATE_EMAIL_MESSAGE, Error, REGISTRATION_FAILED_MESSAGE},
    types::abbrev_uuid,
    validation::{format_phone, sanitize_input, validate_form},
};

pub const REGISTRATION_FORM: &str = "cadastro";
pub const REGISTRATION_PAGE: &str = "/cadastro";
pub const QUESTIONNAIRE_PAGE: &str = "/questionario";

/// Submit the registration form
#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body = RegistrationCreate,
    tag = "registrations",
    responses(
        (status = 201, description = "Registered", body = RegistrationCreated),
        (status = 400, description = "One or more fields are invalid"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Registration could not be stored"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RegistrationCreate>,
) -> Result<(StatusCode, Json<RegistrationCreated>), Error> {
    let session_id = session_or_new(request.session_id.clone());
    let mut context = EventContext {
        session_id: session_id.clone(),
        registration_id: None,
        page_path: Some(REGISTRATION_PAGE.to_string()),
        user_agent: user_agent(&headers),
    };

    if let Err(fields) = validate_form(&request.full_name, &request.email, &request.whatsapp) {
        state
            .analytics
            .track(&context, Event::form_submit(REGISTRATION_FORM, Err("validation")))
            .await;
        return Err(Error::Validation { fields });
    }

    let db_request = RegistrationCreateDBRequest {
        full_name: sanitize_input(&request.full_name),
        email: sanitize_input(&request.email).to_lowercase(),
        whatsapp: format_phone(&sanitize_input(&request.whatsapp)),
        ip_address: Some(client_ip(&headers)),
        selfie_url: None,
        pet_photos: None,
        session_id: Some(session_id),
    };

    let registration = match state.store.create_registration(&db_request).await {
        Ok(registration) => registration,
        Err(e) => {
            let duplicate = e.is_duplicate_email();
            let message = if duplicate { DUPLICATE_EMAIL_MESSAGE } else { REGISTRATION_FAILED_MESSAGE };
            state
                .analytics
                .track(&context, Event::form_submit(REGISTRATION_FORM, Err(message)))
                .await;

            if duplicate {
                return Err(Error::Database(e));
            }
            error!("Failed to store registration: {e:#}");
            return Err(Error::Unavailable {
                message: message.to_string(),
            });
        }
    };

    info!(registration_id = %abbrev_uuid(&registration.id), "New registration");

    context.registration_id = Some(registration.id);
    state
        .analytics
        .track(&context, Event::form_submit(REGISTRATION_FORM, Ok(())))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(RegistrationCreated {
            id: registration.id,
            redirect_to: QUESTIONNAIRE_PAGE.to_string(),
            redirect_after_ms: state.config.timing.registration_redirect_delay.as_millis() as u64,
        }),
    ))
}
