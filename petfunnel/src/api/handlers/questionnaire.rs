use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{registrations::QUESTIONNAIRE_PAGE, session_or_new, user_agent};
use crate::{
    AppState,
    analytics::{Event, EventContext},
    api::models::questionnaire::{AnswerRequest, QuestionnaireStart, QuestionnaireState},
    errors::Error,
    questionnaire::{
        AnswerError, Step,
        session::{QuestionnaireSession, SessionError},
        to_pet_request, to_questionnaire_request,
    },
    types::{RegistrationId, abbrev_uuid},
};

impl From<SessionError> for Error {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(id) => Error::NotFound {
                resource: "Questionnaire session".to_string(),
                id: id.to_string(),
            },
            SessionError::Answer(e) => Error::BadRequest {
                message: match e {
                    AnswerError::Finished => "O questionário já foi concluído",
                    AnswerError::InvalidChoice => "Escolha uma das opções apresentadas",
                    AnswerError::EmptyInput => "Digite uma resposta para continuar",
                }
                .to_string(),
            },
        }
    }
}

/// The step on screen: a finished session keeps showing the final message.
fn shown_step(session: &QuestionnaireSession) -> Step {
    if session.is_finished() { Step::FinalMsg } else { session.current }
}

/// Store the completed answers. Failures are logged and dropped; the dialog has already moved on.
async fn store_answers(state: &AppState, registration_id: Option<RegistrationId>, answers: &BTreeMap<Step, String>) {
    let Some(registration_id) = registration_id else {
        debug!("Questionnaire finished without a registration; nothing stored");
        return;
    };

    match state
        .store
        .create_questionnaire(&to_questionnaire_request(registration_id, answers))
        .await
    {
        Ok(stored) => info!(
            registration_id = %abbrev_uuid(&registration_id),
            questionnaire_id = %abbrev_uuid(&stored.id),
            "Stored questionnaire answers"
        ),
        Err(e) => warn!(registration_id = %abbrev_uuid(&registration_id), "Error saving answers: {e:#}"),
    }

    let Some(pet) = to_pet_request(registration_id, answers) else {
        return;
    };
    if let Err(e) = state.store.create_pet(&pet).await {
        warn!(registration_id = %abbrev_uuid(&registration_id), "Error saving pet: {e:#}");
    }
}

/// Open a questionnaire dialog
#[utoipa::path(
    post,
    path = "/api/questionnaire",
    request_body = QuestionnaireStart,
    tag = "questionnaire",
    responses(
        (status = 201, description = "Dialog opened at the first question", body = QuestionnaireState),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn start_questionnaire(
    State(state): State<AppState>,
    Json(request): Json<QuestionnaireStart>,
) -> Result<(StatusCode, Json<QuestionnaireState>), Error> {
    let session = state
        .sessions
        .open(request.registration_id, session_or_new(request.session_id));
    debug!(session_id = %abbrev_uuid(&session.id), "Opened questionnaire session");

    let shown = shown_step(&session);
    Ok((
        StatusCode::CREATED,
        Json(QuestionnaireState::new(session, shown, &state.config.timing)),
    ))
}

/// Current step and transcript of a dialog
#[utoipa::path(
    get,
    path = "/api/questionnaire/{id}",
    tag = "questionnaire",
    params(("id" = String, Path, description = "Questionnaire session ID")),
    responses(
        (status = 200, description = "Dialog state", body = QuestionnaireState),
        (status = 404, description = "Unknown or expired session"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_questionnaire(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<QuestionnaireState>, Error> {
    let session = state.sessions.get(id).ok_or(SessionError::NotFound(id))?;
    let shown = shown_step(&session);
    Ok(Json(QuestionnaireState::new(session, shown, &state.config.timing)))
}

/// Answer the current step
#[utoipa::path(
    post,
    path = "/api/questionnaire/{id}/answers",
    request_body = AnswerRequest,
    tag = "questionnaire",
    params(("id" = String, Path, description = "Questionnaire session ID")),
    responses(
        (status = 200, description = "Answer accepted; the next step is returned", body = QuestionnaireState),
        (status = 400, description = "Answer not valid for this step, or the dialog is over"),
        (status = 404, description = "Unknown or expired session"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn answer_questionnaire(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<QuestionnaireState>, Error> {
    // The registry releases its lock before returning, so nothing below blocks other dialogs
    let (advance, session) = state.sessions.answer(id, &request.value)?;

    let context = EventContext {
        session_id: session.analytics_session_id.clone(),
        registration_id: session.registration_id,
        page_path: Some(QUESTIONNAIRE_PAGE.to_string()),
        user_agent: user_agent(&headers),
    };
    state
        .analytics
        .track(
            &context,
            Event::button_click(&format!("step_{}", advance.answered), json!({ "value": advance.value })),
        )
        .await;

    if let Some(answers) = &advance.completed {
        store_answers(&state, session.registration_id, answers).await;
    }

    Ok(Json(QuestionnaireState::new(session, advance.shown, &state.config.timing)))
}
