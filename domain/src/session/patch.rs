//! Whitelisted partial updates to a session document
//!
//! The engine never performs free-form dictionary merges against the store.
//! Every mutation it is allowed to make is a [`SessionPatch`] variant; the
//! store applies patches in order and observers see monotonically advancing
//! state. [`SessionPatch::field_path`] renders the dotted path the update
//! targets, for logging and store-side diagnostics.

use super::entities::{ConsensusOutcome, DeliberationSession, SessionStatus};
use crate::persona::Persona;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single whitelisted field update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionPatch {
    Status(SessionStatus),
    PushQuestion(String),
    PushUserResponse(String),
    RefinedGoal(String),
    PersonaInitialResponse { persona: Persona, text: String },
    PersonaRevisedResponse { persona: Persona, text: String },
    PersonaCritique { persona: Persona, text: String },
    Consensus(ConsensusOutcome),
    FinalResponses(BTreeMap<Persona, String>),
    Error(String),
}

impl SessionPatch {
    /// Dotted field path this patch writes to
    pub fn field_path(&self) -> String {
        match self {
            SessionPatch::Status(_) => "status".to_string(),
            SessionPatch::PushQuestion(_) => "questions".to_string(),
            SessionPatch::PushUserResponse(_) => "user_responses".to_string(),
            SessionPatch::RefinedGoal(_) => "refined_goal".to_string(),
            SessionPatch::PersonaInitialResponse { persona, .. } => {
                format!("personas.{}.initial_response", persona)
            }
            SessionPatch::PersonaRevisedResponse { persona, .. } => {
                format!("personas.{}.revised_response", persona)
            }
            SessionPatch::PersonaCritique { persona, .. } => {
                format!("personas.{}.critique", persona)
            }
            SessionPatch::Consensus(_) => "consensus".to_string(),
            SessionPatch::FinalResponses(_) => "final_responses".to_string(),
            SessionPatch::Error(_) => "error".to_string(),
        }
    }

    /// Apply this patch to a session, bumping `updated_at`
    pub fn apply(self, session: &mut DeliberationSession) {
        let now = Utc::now();
        match self {
            SessionPatch::Status(status) => session.status = status,
            SessionPatch::PushQuestion(q) => session.questions.push(q),
            SessionPatch::PushUserResponse(a) => session.user_responses.push(a),
            SessionPatch::RefinedGoal(goal) => session.refined_goal = Some(goal),
            SessionPatch::PersonaInitialResponse { persona, text } => {
                let record = session.persona_record_mut(persona);
                record.initial_response = Some(text);
                record.updated_at = Some(now);
            }
            SessionPatch::PersonaRevisedResponse { persona, text } => {
                let record = session.persona_record_mut(persona);
                record.revised_response = Some(text);
                record.updated_at = Some(now);
            }
            SessionPatch::PersonaCritique { persona, text } => {
                let record = session.persona_record_mut(persona);
                record.critique = Some(text);
                record.updated_at = Some(now);
            }
            SessionPatch::Consensus(outcome) => session.consensus = Some(outcome),
            SessionPatch::FinalResponses(map) => session.final_responses = map,
            SessionPatch::Error(text) => session.error = Some(text),
        }
        session.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> DeliberationSession {
        DeliberationSession::new("sess-1", "user-1", "goal", "Q1?")
    }

    #[test]
    fn test_patch_sequence_applies_in_order() {
        let mut s = session();
        let patches = vec![
            SessionPatch::PushUserResponse("A1".to_string()),
            SessionPatch::PushQuestion("Q2?".to_string()),
            SessionPatch::Status(SessionStatus::QuestioningCompleted),
            SessionPatch::RefinedGoal("refined".to_string()),
        ];
        for patch in patches {
            patch.apply(&mut s);
        }
        assert_eq!(s.user_responses, vec!["A1"]);
        assert_eq!(s.questions, vec!["Q1?", "Q2?"]);
        assert_eq!(s.status, SessionStatus::QuestioningCompleted);
        assert_eq!(s.refined_goal.as_deref(), Some("refined"));
    }

    #[test]
    fn test_persona_patch_creates_record() {
        let mut s = session();
        SessionPatch::PersonaInitialResponse {
            persona: Persona::HrManager,
            text: "analysis".to_string(),
        }
        .apply(&mut s);

        let record = &s.personas[&Persona::HrManager];
        assert_eq!(record.initial_response.as_deref(), Some("analysis"));
        assert!(record.updated_at.is_some());
        assert!(record.revised_response.is_none());
    }

    #[test]
    fn test_field_paths() {
        assert_eq!(
            SessionPatch::PersonaCritique {
                persona: Persona::CriticalAnalyst,
                text: String::new(),
            }
            .field_path(),
            "personas.critical_analyst.critique"
        );
        assert_eq!(
            SessionPatch::Status(SessionStatus::Completed).field_path(),
            "status"
        );
    }
}
