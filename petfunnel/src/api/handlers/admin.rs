//! Admin login and the two dashboards.
//!
//! Every handler except login and logout takes a [`CurrentAdmin`], so requests without a valid
//! session cookie are rejected with 401 before any data is read.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};

use crate::{
    AppState,
    api::models::{
        admin::{
            CLEAR_CONFIRMATION, ClearRequest, ClearResponse, EventStats, LoginRequest, LoginResponse, Overview, PetResponse,
            QuestionnaireResponse, RegistrationDetails, RegistrationSearch, UserJourney,
        },
        events::UserEventResponse,
    },
    auth::{
        current_admin::{CurrentAdmin, expired_session_cookie, session_cookie},
        session,
    },
    dashboard,
    db::{PetFilter, QuestionnaireFilter, RegistrationFilter, UserEventFilter},
    errors::Error,
    types::{RegistrationId, abbrev_uuid},
};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Credenciais inválidas";
pub const CLEARED_MESSAGE: &str = "Banco de dados limpo com sucesso!";
pub const CLEAR_FAILED_MESSAGE: &str = "Erro ao limpar banco de dados. Tente novamente.";

/// Log in to the dashboards
#[utoipa::path(
    post,
    path = "/admin/api/login",
    request_body = LoginRequest,
    tag = "admin",
    responses(
        (status = 200, description = "Logged in; the session cookie is set", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<impl IntoResponse, Error> {
    let admin = state
        .admin
        .verify(&request.email, &request.password)
        .await?
        .ok_or_else(|| Error::Unauthenticated {
            message: Some(INVALID_CREDENTIALS_MESSAGE.to_string()),
        })?;

    let token = session::create_session_token(&admin, &state.config)?;
    let cookie = session_cookie(&token, &state.config);
    info!("Admin logged in");

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            email: admin.email,
            message: "Login realizado com sucesso".to_string(),
        }),
    ))
}

/// Log out, clearing the session cookie
#[utoipa::path(
    post,
    path = "/admin/api/logout",
    tag = "admin",
    responses(
        (status = 200, description = "Logged out"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, expired_session_cookie(&state.config))],
        Json(json!({ "message": "Sessão encerrada" })),
    )
}

/// The logged-in admin
#[utoipa::path(
    get,
    path = "/admin/api/me",
    tag = "admin",
    responses(
        (status = 200, description = "Current admin", body = CurrentAdmin),
        (status = 401, description = "Not logged in"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn me(admin: CurrentAdmin) -> Json<CurrentAdmin> {
    Json(admin)
}

/// Headline numbers for the classic dashboard
#[utoipa::path(
    get,
    path = "/admin/api/overview",
    tag = "admin",
    responses(
        (status = 200, description = "Totals, rates and the newest rows", body = Overview),
        (status = 401, description = "Not logged in"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn overview(_admin: CurrentAdmin, State(state): State<AppState>) -> Result<Json<Overview>, Error> {
    let registrations = state.store.list_registrations(&RegistrationFilter::default()).await?;
    let questionnaires = state.store.list_questionnaires(&QuestionnaireFilter::default()).await?;
    let pets = state.store.list_pets(&PetFilter::default()).await?;

    Ok(Json(dashboard::overview(&registrations, &questionnaires, &pets)))
}

/// Registrations matching the search, each with its pets and questionnaire
#[utoipa::path(
    get,
    path = "/admin/api/registrations",
    tag = "admin",
    params(RegistrationSearch),
    responses(
        (status = 200, description = "Matching registrations, newest first", body = [RegistrationDetails]),
        (status = 401, description = "Not logged in"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_registrations(
    _admin: CurrentAdmin,
    State(state): State<AppState>,
    Query(query): Query<RegistrationSearch>,
) -> Result<Json<Vec<RegistrationDetails>>, Error> {
    let search = query.search.unwrap_or_default();
    let registrations: Vec<_> = state
        .store
        .list_registrations(&RegistrationFilter::default())
        .await?
        .into_iter()
        .filter(|r| dashboard::matches_search(r, &search))
        .collect();
    let pets = state.store.list_pets(&PetFilter::default()).await?;
    let questionnaires = state.store.list_questionnaires(&QuestionnaireFilter::default()).await?;

    Ok(Json(dashboard::join_registrations(registrations, pets, questionnaires)))
}

/// Registrations matching the search, as a CSV download
#[utoipa::path(
    get,
    path = "/admin/api/registrations/export",
    tag = "admin",
    params(RegistrationSearch),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv"),
        (status = 401, description = "Not logged in"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn export_registrations(
    _admin: CurrentAdmin,
    State(state): State<AppState>,
    Query(query): Query<RegistrationSearch>,
) -> Result<impl IntoResponse, Error> {
    let search = query.search.unwrap_or_default();
    let registrations: Vec<_> = state
        .store
        .list_registrations(&RegistrationFilter::default())
        .await?
        .into_iter()
        .filter(|r| dashboard::matches_search(r, &search))
        .collect();

    let disposition = format!("attachment; filename=\"{}\"", dashboard::export_file_name(&Utc::now()));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        dashboard::registrations_csv(&registrations),
    ))
}

/// Every pet, newest first
#[utoipa::path(
    get,
    path = "/admin/api/pets",
    tag = "admin",
    responses(
        (status = 200, description = "Pets", body = [PetResponse]),
        (status = 401, description = "Not logged in"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_pets(_admin: CurrentAdmin, State(state): State<AppState>) -> Result<Json<Vec<PetResponse>>, Error> {
    let pets = state.store.list_pets(&PetFilter::default()).await?;
    Ok(Json(pets.into_iter().map(Into::into).collect()))
}

/// Every stored questionnaire, newest first
#[utoipa::path(
    get,
    path = "/admin/api/questionnaires",
    tag = "admin",
    responses(
        (status = 200, description = "Questionnaires", body = [QuestionnaireResponse]),
        (status = 401, description = "Not logged in"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_questionnaires(
    _admin: CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuestionnaireResponse>>, Error> {
    let questionnaires = state.store.list_questionnaires(&QuestionnaireFilter::default()).await?;
    Ok(Json(questionnaires.into_iter().map(Into::into).collect()))
}

/// Delete everything
///
/// Requires `confirm` to be exactly `EXCLUIR TUDO`.
#[utoipa::path(
    post,
    path = "/admin/api/clear",
    request_body = ClearRequest,
    tag = "admin",
    responses(
        (status = 200, description = "All collections emptied", body = ClearResponse),
        (status = 400, description = "Confirmation text does not match"),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Delete failed"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn clear_database(
    admin: CurrentAdmin,
    State(state): State<AppState>,
    Json(request): Json<ClearRequest>,
) -> Result<Json<ClearResponse>, Error> {
    if request.confirm != CLEAR_CONFIRMATION {
        return Err(Error::BadRequest {
            message: format!("Digite \"{CLEAR_CONFIRMATION}\" para confirmar"),
        });
    }

    let deleted = state.store.clear_all().await.map_err(|e| {
        error!("Failed to clear database: {e:#}");
        Error::Unavailable {
            message: CLEAR_FAILED_MESSAGE.to_string(),
        }
    })?;
    warn!(admin = %admin.email, ?deleted, "Database cleared");

    Ok(Json(ClearResponse {
        message: CLEARED_MESSAGE.to_string(),
        deleted,
    }))
}

/// Totals for the event dashboard
#[utoipa::path(
    get,
    path = "/admin/api/events/stats",
    tag = "admin",
    responses(
        (status = 200, description = "Event totals", body = EventStats),
        (status = 401, description = "Not logged in"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn event_stats(_admin: CurrentAdmin, State(state): State<AppState>) -> Result<Json<EventStats>, Error> {
    let registrations = state.store.list_registrations(&RegistrationFilter::default()).await?;
    let events = state.store.list_events(&UserEventFilter::default()).await?;

    Ok(Json(dashboard::event_stats(registrations.len(), &events)))
}

/// One registration's full journey
#[utoipa::path(
    get,
    path = "/admin/api/users/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration with its events, pets and questionnaire", body = UserJourney),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Registration not found"),
    )
)]
#[tracing::instrument(skip_all, fields(registration_id = %abbrev_uuid(&id)))]
pub async fn user_journey(
    _admin: CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<RegistrationId>,
) -> Result<Json<UserJourney>, Error> {
    let registration = state.store.get_registration(id).await?.ok_or_else(|| Error::NotFound {
        resource: "Registration".to_string(),
        id: id.to_string(),
    })?;

    let events = state
        .store
        .list_events(&UserEventFilter {
            session_id: registration.session_id.clone(),
            registration_id: Some(id),
            oldest_first: true,
        })
        .await?;
    let pets = state.store.list_pets(&PetFilter { registration_id: Some(id) }).await?;
    let questionnaire = state
        .store
        .list_questionnaires(&QuestionnaireFilter { registration_id: Some(id) })
        .await?
        .into_iter()
        .next();

    Ok(Json(UserJourney {
        registration: registration.into(),
        events: events.into_iter().map(UserEventResponse::from).collect(),
        pets: pets.into_iter().map(Into::into).collect(),
        questionnaire: questionnaire.map(Into::into),
    }))
}
