//! In-memory dialog sessions for the questionnaire.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AnswerError, GREETING, Presentation, Step};
use crate::types::RegistrationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Bot,
    User,
}

/// One chat bubble
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

/// The result of one accepted answer
#[derive(Debug, Clone)]
pub struct Advance {
    /// The step that was answered
    pub answered: Step,
    /// The stored value
    pub value: String,
    /// The step whose message the client should show next
    pub shown: Step,
    /// Set when this answer finished the questionnaire: the complete answer map
    pub completed: Option<BTreeMap<Step, String>>,
}

#[derive(Debug, Clone)]
pub struct QuestionnaireSession {
    pub id: Uuid,
    pub registration_id: Option<RegistrationId>,
    /// Analytics session the answer events are recorded under
    pub analytics_session_id: String,
    pub current: Step,
    pub answers: BTreeMap<Step, String>,
    pub transcript: Vec<TranscriptEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionnaireSession {
    pub fn new(registration_id: Option<RegistrationId>, analytics_session_id: String) -> Self {
        let now = Utc::now();
        let mut session = Self {
            id: Uuid::new_v4(),
            registration_id,
            analytics_session_id,
            current: Step::Q1,
            answers: BTreeMap::new(),
            transcript: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        session.say(Speaker::Bot, GREETING);
        session.say(Speaker::Bot, Step::Q1.script().text);
        session
    }

    fn say(&mut self, speaker: Speaker, text: &str) {
        if !text.is_empty() {
            self.transcript.push(TranscriptEntry {
                speaker,
                text: text.to_string(),
            });
        }
    }

    pub fn is_finished(&self) -> bool {
        self.current == Step::End
    }

    /// Record an answer for the current step and advance.
    ///
    /// Once Q12 is answered the dialog shows FINAL_MSG, which takes no answer, so the session
    /// moves straight on to END and hands back the completed answers for storage.
    pub fn answer(&mut self, raw: &str) -> Result<Advance, AnswerError> {
        let answered = self.current;
        let accepted = answered.accept(raw)?;

        self.answers.insert(answered, accepted.value.clone());
        self.say(Speaker::User, &accepted.label);

        let shown = answered.next();
        self.say(Speaker::Bot, shown.script().text);
        self.current = shown;

        let completed = if shown.script().presentation == Presentation::EndFlow || shown == Step::End {
            self.current = Step::End;
            Some(self.answers.clone())
        } else {
            None
        };

        self.updated_at = Utc::now();

        Ok(Advance {
            answered,
            value: accepted.value,
            shown,
            completed,
        })
    }

    fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.updated_at).to_std().unwrap_or_default()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("questionnaire session {0} not found")]
    NotFound(Uuid),
    #[error(transparent)]
    Answer(#[from] AnswerError),
}

/// Open dialog sessions, keyed by session id.
///
/// Sessions idle for longer than the TTL are dropped whenever a new one is opened.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<Uuid, QuestionnaireSession>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn prune(&self) {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.age(now) < self.ttl);
        let pruned = before.saturating_sub(self.sessions.len());
        if pruned > 0 {
            debug!(pruned, "Dropped idle questionnaire sessions");
        }
    }

    /// Start a new dialog and return a snapshot of it
    pub fn open(&self, registration_id: Option<RegistrationId>, analytics_session_id: String) -> QuestionnaireSession {
        self.prune();
        let session = QuestionnaireSession::new(registration_id, analytics_session_id);
        self.sessions.insert(session.id, session.clone());
        session
    }

    /// Snapshot of a live session
    pub fn get(&self, id: Uuid) -> Option<QuestionnaireSession> {
        let session = self.sessions.get(&id)?;
        (session.age(Utc::now()) < self.ttl).then(|| session.clone())
    }

    /// Answer the current step of a session.
    ///
    /// The shard lock is released before returning, so callers can do slow work with the result.
    pub fn answer(&self, id: Uuid, raw: &str) -> Result<(Advance, QuestionnaireSession), SessionError> {
        let mut session = self.sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        if session.age(Utc::now()) >= self.ttl {
            return Err(SessionError::NotFound(id));
        }
        let advance = session.answer(raw)?;
        Ok((advance, session.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::SEQUENCE;

    /// A valid answer for every answerable step
    fn valid_answer(step: Step) -> &'static str {
        let script = step.script();
        match script.presentation {
            Presentation::Input => "Resposta livre",
            _ => script.choices[0].value,
        }
    }

    #[test]
    fn test_new_session_greets_and_asks_q1() {
        let session = QuestionnaireSession::new(None, "s".to_string());
        assert_eq!(session.current, Step::Q1);
        assert_eq!(session.transcript.len(), 2);
        assert_eq!(session.transcript[0].text, GREETING);
        assert_eq!(session.transcript[1].text, Step::Q1.script().text);
    }

    #[test]
    fn test_answers_advance_in_sequence_order() {
        let mut session = QuestionnaireSession::new(None, "s".to_string());

        for step in SEQUENCE.iter().take_while(|s| **s != Step::FinalMsg) {
            assert_eq!(session.current, *step);
            let advance = session.answer(valid_answer(*step)).unwrap();
            assert_eq!(advance.answered, *step);
            assert_eq!(advance.shown, step.next());
        }

        assert!(session.is_finished());
        assert_eq!(session.answers.len(), 13);
    }

    #[test]
    fn test_only_the_last_answer_completes() {
        let mut session = QuestionnaireSession::new(None, "s".to_string());

        while session.current != Step::Q12 {
            let step = session.current;
            let advance = session.answer(valid_answer(step)).unwrap();
            assert!(advance.completed.is_none(), "{step} should not complete");
        }

        let advance = session.answer("Tudo certo").unwrap();
        assert_eq!(advance.shown, Step::FinalMsg);
        let completed = advance.completed.unwrap();
        assert_eq!(completed[&Step::Q12], "Tudo certo");
        assert_eq!(session.current, Step::End);
        assert_eq!(session.transcript.last().unwrap().text, Step::FinalMsg.script().text);
    }

    #[test]
    fn test_finished_session_rejects_answers() {
        let mut session = QuestionnaireSession::new(None, "s".to_string());
        while !session.is_finished() {
            let step = session.current;
            session.answer(valid_answer(step)).unwrap();
        }

        assert_eq!(session.answer("1").unwrap_err(), AnswerError::Finished);
    }

    #[test]
    fn test_rejected_answer_changes_nothing() {
        let mut session = QuestionnaireSession::new(None, "s".to_string());
        let before = session.transcript.len();

        assert_eq!(session.answer("7").unwrap_err(), AnswerError::InvalidChoice);
        assert_eq!(session.current, Step::Q1);
        assert!(session.answers.is_empty());
        assert_eq!(session.transcript.len(), before);
    }

    #[test]
    fn test_transcript_records_labels_not_values() {
        let mut session = QuestionnaireSession::new(None, "s".to_string());
        session.answer("3+").unwrap();

        assert_eq!(session.answers[&Step::Q1], "3+");
        assert_eq!(
            session.transcript[2],
            TranscriptEntry {
                speaker: Speaker::User,
                text: "3 ou mais".to_string()
            }
        );
        assert_eq!(session.transcript[3].text, Step::Q2.script().text);
    }

    #[test]
    fn test_registry_round_trip() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let session = registry.open(None, "s".to_string());

        let (advance, snapshot) = registry.answer(session.id, "2").unwrap();
        assert_eq!(advance.value, "2");
        assert_eq!(snapshot.current, Step::Q2);
        assert_eq!(registry.get(session.id).unwrap().current, Step::Q2);
    }

    #[test]
    fn test_registry_unknown_session() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let id = Uuid::new_v4();
        assert!(matches!(registry.answer(id, "1"), Err(SessionError::NotFound(missing)) if missing == id));
        assert!(registry.get(id).is_none());
    }

    #[test]
    fn test_registry_prunes_idle_sessions() {
        let registry = SessionRegistry::new(Duration::ZERO);
        let first = registry.open(None, "a".to_string());

        // A zero TTL makes every session idle immediately
        assert!(registry.get(first.id).is_none());
        assert!(matches!(registry.answer(first.id, "1"), Err(SessionError::NotFound(_))));

        registry.open(None, "b".to_string());
        assert_eq!(registry.len(), 1);
    }
}
