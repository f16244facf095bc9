//! Funnel analytics.
//!
//! Events are fire-and-forget: a failed insert is logged at warn and otherwise ignored, so
//! analytics can never break the request that produced them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::db::{Store, models::events::UserEventCreateDBRequest};
use crate::types::RegistrationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PageView,
    ButtonClick,
    FormStart,
    FormSubmit,
    FormError,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::PageView => "page_view",
            EventType::ButtonClick => "button_click",
            EventType::FormStart => "form_start",
            EventType::FormSubmit => "form_submit",
            EventType::FormError => "form_error",
        }
    }
}

/// What happened
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub event_name: String,
    pub event_data: Value,
}

impl Event {
    /// `view_<page>`
    pub fn page_view(page: &str) -> Self {
        Self {
            event_type: EventType::PageView,
            event_name: format!("view_{page}"),
            event_data: json!({ "page_name": page }),
        }
    }

    /// `click_<button>`, with any extra fields merged into the data
    pub fn button_click(button: &str, extra: Value) -> Self {
        let mut data = Map::new();
        data.insert("button_name".to_string(), Value::String(button.to_string()));
        if let Value::Object(extra) = extra {
            data.extend(extra);
        }

        Self {
            event_type: EventType::ButtonClick,
            event_name: format!("click_{button}"),
            event_data: Value::Object(data),
        }
    }

    /// `start_<form>`
    pub fn form_start(form: &str) -> Self {
        Self {
            event_type: EventType::FormStart,
            event_name: format!("start_{form}"),
            event_data: json!({ "form_name": form }),
        }
    }

    /// `submit_<form>` on success, `error_<form>` carrying the error otherwise
    pub fn form_submit(form: &str, outcome: Result<(), &str>) -> Self {
        match outcome {
            Ok(()) => Self {
                event_type: EventType::FormSubmit,
                event_name: format!("submit_{form}"),
                event_data: json!({ "form_name": form, "success": true }),
            },
            Err(error) => Self {
                event_type: EventType::FormError,
                event_name: format!("error_{form}"),
                event_data: json!({ "form_name": form, "success": false, "error": error }),
            },
        }
    }
}

/// Who it happened to, and where
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    pub session_id: String,
    pub registration_id: Option<RegistrationId>,
    pub page_path: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Clone)]
pub struct Analytics {
    store: Arc<dyn Store>,
}

impl Analytics {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Record an event. Never fails; a storage error is logged and dropped.
    pub async fn track(&self, context: &EventContext, event: Event) {
        let request = UserEventCreateDBRequest {
            session_id: context.session_id.clone(),
            registration_id: context.registration_id,
            event_type: event.event_type.as_str().to_string(),
            event_name: event.event_name,
            page_path: context.page_path.clone(),
            event_data: event.event_data,
            user_agent: context.user_agent.clone(),
        };

        match self.store.create_event(&request).await {
            Ok(stored) => debug!(event_name = %stored.event_name, "Tracked event"),
            Err(e) => warn!(event_name = %request.event_name, "Error tracking event: {e:#}"),
        }
    }
}
