//! HTTP handlers for the optional PIX donation.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde_json::json;
use tracing::{info, warn};

use super::{session_or_new, user_agent};
use crate::{
    AppState,
    analytics::{Event, EventContext},
    api::models::{
        events::TrackEventResponse,
        payments::{PixCopiedRequest, PixRequest, PixResponse},
        questionnaire::PAYMENT_PAGE,
    },
    errors::Error,
    payment_providers::{Customer, PixChargeRequest},
    types::{RegistrationId, abbrev_uuid},
    validation::digits_only,
};

/// The payer: the registration's contact details when we have them, the configured default otherwise.
async fn customer_for(state: &AppState, registration_id: Option<RegistrationId>) -> Customer {
    let fallback = Customer::from(&state.config.contribution.default_customer);
    let Some(id) = registration_id else {
        return fallback;
    };

    match state.store.get_registration(id).await {
        Ok(Some(registration)) => Customer {
            name: registration.full_name,
            email: registration.email,
            phone: digits_only(&registration.whatsapp),
            document: fallback.document,
        },
        Ok(None) => {
            info!(registration_id = %abbrev_uuid(&id), "Unknown registration; using default customer");
            fallback
        }
        Err(e) => {
            warn!(registration_id = %abbrev_uuid(&id), "Error loading registration, using default customer: {e:#}");
            fallback
        }
    }
}

/// Generate a PIX code for the voluntary donation
#[utoipa::path(
    post,
    path = "/api/payments/pix",
    request_body = PixRequest,
    tag = "payments",
    responses(
        (status = 200, description = "PIX code generated", body = PixResponse),
        (status = 502, description = "The payment gateway failed"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_pix(State(state): State<AppState>, Json(request): Json<PixRequest>) -> Result<Json<PixResponse>, Error> {
    let contribution = &state.config.contribution;
    let charge_request = PixChargeRequest {
        amount_cents: contribution.amount_cents,
        item_title: contribution.item_title.clone(),
        expires_in_secs: contribution.expires_in.as_secs(),
        customer: customer_for(&state, request.registration_id).await,
    };

    let charge = state.payment.create_pix_charge(&charge_request).await?;

    Ok(Json(PixResponse {
        qrcode: charge.qrcode,
        qrcode_text: charge.qrcode_text,
        amount_cents: charge_request.amount_cents,
    }))
}

/// Record that the PIX code was copied
#[utoipa::path(
    post,
    path = "/api/payments/pix/copied",
    request_body = PixCopiedRequest,
    tag = "payments",
    responses(
        (status = 202, description = "Recorded", body = TrackEventResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn pix_copied(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PixCopiedRequest>,
) -> (StatusCode, Json<TrackEventResponse>) {
    let context = EventContext {
        session_id: session_or_new(request.session_id),
        registration_id: request.registration_id,
        page_path: Some(PAYMENT_PAGE.to_string()),
        user_agent: user_agent(&headers),
    };
    let amount = state.config.contribution.amount_cents as f64 / 100.0;

    state
        .analytics
        .track(&context, Event::button_click("copiar_pix", json!({ "valor": amount })))
        .await;

    (
        StatusCode::ACCEPTED,
        Json(TrackEventResponse {
            session_id: context.session_id,
        }),
    )
}
