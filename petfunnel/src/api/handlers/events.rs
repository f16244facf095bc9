use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde_json::{Map, Value};

use super::{session_or_new, user_agent};
use crate::{
    AppState,
    analytics::{Event, EventContext},
    api::models::events::{TrackEventRequest, TrackEventResponse},
};

/// Event data with the campaign fields folded in. Non-object data is kept under `value`.
fn merge_event_data(request: &TrackEventRequest) -> Value {
    let mut data = match &request.event_data {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::Null) | None => Map::new(),
        Some(other) => Map::from_iter([("value".to_string(), other.clone())]),
    };

    let campaign = [
        ("utm_source", &request.utm_source),
        ("utm_medium", &request.utm_medium),
        ("utm_campaign", &request.utm_campaign),
        ("referrer", &request.referrer),
    ];
    for (key, value) in campaign {
        if let Some(value) = value {
            data.insert(key.to_string(), Value::String(value.clone()));
        }
    }

    Value::Object(data)
}

/// Record an analytics event
///
/// Always accepted: storage failures are logged and never reach the client.
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = TrackEventRequest,
    tag = "events",
    responses(
        (status = 202, description = "Accepted; use the returned session id from now on", body = TrackEventResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn track_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<TrackEventRequest>,
) -> (StatusCode, Json<TrackEventResponse>) {
    let event = Event {
        event_type: request.event_type,
        event_name: request.event_name.clone(),
        event_data: merge_event_data(&request),
    };
    let context = EventContext {
        session_id: session_or_new(request.session_id),
        registration_id: request.registration_id,
        page_path: request.page_path,
        user_agent: user_agent(&headers),
    };

    state.analytics.track(&context, event).await;

    (
        StatusCode::ACCEPTED,
        Json(TrackEventResponse {
            session_id: context.session_id,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, Store, UserEventFilter};
    use crate::test_utils::{FailingStore, Fault, create_test_app, create_test_app_with_store};
    use axum::http::header::USER_AGENT;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_event_is_stored_with_campaign_fields_and_user_agent() {
        let (server, store) = create_test_app().await;

        let response = server
            .post("/api/events")
            .add_header(USER_AGENT, "Mozilla/5.0 (test)")
            .json(&json!({
                "session_id": "browser-session",
                "event_type": "page_view",
                "event_name": "view_home",
                "page_path": "/",
                "event_data": { "page_name": "home" },
                "utm_source": "instagram",
                "referrer": "https://example.org/"
            }))
            .await;

        response.assert_status(StatusCode::ACCEPTED);
        let body: TrackEventResponse = response.json();
        assert_eq!(body.session_id, "browser-session");

        let events = store.list_events(&UserEventFilter::default()).await.unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.event_type, "page_view");
        assert_eq!(event.page_path.as_deref(), Some("/"));
        assert_eq!(event.user_agent.as_deref(), Some("Mozilla/5.0 (test)"));
        assert_eq!(
            event.event_data,
            json!({ "page_name": "home", "utm_source": "instagram", "referrer": "https://example.org/" })
        );
    }

    #[tokio::test]
    async fn test_missing_session_gets_a_new_one() {
        let (server, store) = create_test_app().await;

        let body: TrackEventResponse = server
            .post("/api/events")
            .json(&json!({ "event_type": "button_click", "event_name": "click_participar" }))
            .await
            .json();

        assert!(uuid::Uuid::parse_str(&body.session_id).is_ok());
        let events = store.list_events(&UserEventFilter::default()).await.unwrap();
        assert_eq!(events[0].session_id, body.session_id);
    }

    #[tokio::test]
    async fn test_storage_failure_is_still_accepted() {
        let store = Arc::new(FailingStore::new(MemoryStore::new(), Fault::Events));
        let server = create_test_app_with_store(store).await;

        server
            .post("/api/events")
            .json(&json!({ "session_id": "s", "event_type": "page_view", "event_name": "view_home" }))
            .await
            .assert_status(StatusCode::ACCEPTED);
    }

    #[test]
    fn test_non_object_data_is_wrapped() {
        let request: TrackEventRequest = serde_json::from_value(json!({
            "event_type": "button_click",
            "event_name": "click_x",
            "event_data": 42,
            "utm_medium": "cpc"
        }))
        .unwrap();

        assert_eq!(merge_event_data(&request), json!({ "value": 42, "utm_medium": "cpc" }));
    }
}
