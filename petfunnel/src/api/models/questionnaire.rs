//! API request/response models for the questionnaire dialog.

use crate::config::TimingConfig;
use crate::questionnaire::{
    Presentation, Step,
    session::{QuestionnaireSession, TranscriptEntry},
};
use crate::types::RegistrationId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Where the client goes once the final message has been shown
pub const PAYMENT_PAGE: &str = "/pagamento";

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct QuestionnaireStart {
    /// Registration the answers will be stored against. Without one nothing is stored.
    #[schema(value_type = Option<String>, format = "uuid")]
    pub registration_id: Option<RegistrationId>,
    /// Analytics session to record answer events under
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnswerRequest {
    /// A choice value for option steps, free text for input steps
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChoiceView {
    pub value: String,
    pub label: String,
}

/// One step as the client renders it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StepView {
    pub step: Step,
    pub text: String,
    pub mode: Presentation,
    pub choices: Vec<ChoiceView>,
    /// Show a typing indicator this long before the message
    pub typing_delay_ms: u64,
    /// Then wait this long before showing the answer controls
    pub reveal_delay_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_after_ms: Option<u64>,
}

impl StepView {
    pub fn new(step: Step, timing: &TimingConfig) -> Self {
        let script = step.script();
        let end_flow = script.presentation == Presentation::EndFlow;

        Self {
            step,
            text: script.text.to_string(),
            mode: script.presentation,
            choices: script
                .choices
                .iter()
                .map(|c| ChoiceView {
                    value: c.value.to_string(),
                    label: c.label.to_string(),
                })
                .collect(),
            typing_delay_ms: timing.typing_delay.as_millis() as u64,
            reveal_delay_ms: timing.reveal_delay.as_millis() as u64,
            redirect_to: end_flow.then(|| PAYMENT_PAGE.to_string()),
            redirect_after_ms: end_flow.then(|| timing.final_redirect_delay.as_millis() as u64),
        }
    }
}

/// A dialog session: where it stands and what has been said
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuestionnaireState {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,
    /// Analytics session the answers are recorded under
    pub session_id: String,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub registration_id: Option<RegistrationId>,
    pub current_step: Step,
    pub finished: bool,
    /// The step the client should be displaying
    pub step: StepView,
    pub transcript: Vec<TranscriptEntry>,
}

impl QuestionnaireState {
    /// `shown` is the step on screen, which differs from `current_step` once the final message
    /// has moved the session on to END.
    pub fn new(session: QuestionnaireSession, shown: Step, timing: &TimingConfig) -> Self {
        Self {
            id: session.id,
            finished: session.is_finished(),
            session_id: session.analytics_session_id,
            registration_id: session.registration_id,
            current_step: session.current,
            step: StepView::new(shown, timing),
            transcript: session.transcript,
        }
    }
}
