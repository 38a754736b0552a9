//! Socratic Refiner use case
//!
//! Turns a vague user goal into a debate-ready refined goal through a short
//! question-and-answer exchange. The opening question is fixed; every
//! follow-up comes from the questioner role, and after
//! `MAX_SOCRATIC_QUESTIONS` answers one synthesis call produces the refined
//! goal.

use crate::ports::model_gateway::{GatewayError, ModelGateway, complete_role};
use crate::ports::session_store::{SessionStore, StoreError};
use conclave_domain::{
    AdvisoryRole, DeliberationSession, DomainError, Goal, MAX_SOCRATIC_QUESTIONS, PersonaRegistry,
    PromptTemplate, SessionPatch, SessionStatus,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during goal refinement
#[derive(Error, Debug)]
pub enum RefineError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session {0} does not belong to the requesting user")]
    PermissionDenied(String),

    #[error("Questioning is already complete for session {0}")]
    QuestioningClosed(String),

    #[error(transparent)]
    InvalidGoal(#[from] DomainError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of starting a refinement session
#[derive(Debug, Clone)]
pub struct StartedRefinement {
    pub session_id: String,
    pub question: String,
}

/// Result of answering a refinement question
#[derive(Debug, Clone)]
pub enum RefinementStep {
    /// More questioning to do
    NextQuestion(String),
    /// Questioning finished; the refined goal is persisted on the session
    Complete { refined_goal: String },
}

impl RefinementStep {
    pub fn is_complete(&self) -> bool {
        matches!(self, RefinementStep::Complete { .. })
    }
}

/// Use case for Socratic goal refinement
pub struct SocraticRefiner<G: ModelGateway + 'static, S: SessionStore + 'static> {
    gateway: Arc<G>,
    store: Arc<S>,
    registry: Arc<PersonaRegistry>,
}

impl<G: ModelGateway + 'static, S: SessionStore + 'static> SocraticRefiner<G, S> {
    pub fn new(gateway: Arc<G>, store: Arc<S>, registry: Arc<PersonaRegistry>) -> Self {
        Self {
            gateway,
            store,
            registry,
        }
    }

    /// Begin refinement: validate the goal, create the session, and return
    /// the fixed opening question
    pub async fn start(
        &self,
        user_id: &str,
        initial_goal: &str,
    ) -> Result<StartedRefinement, RefineError> {
        let goal = Goal::new(initial_goal)?;
        let session_id = new_session_id();
        let question = PromptTemplate::opening_question().to_string();

        let session = DeliberationSession::new(&session_id, user_id, goal.content(), &question);
        debug_assert!(session.questioning_within_bounds());
        self.store.create(session).await?;

        info!(session_id, "Refinement session started");
        Ok(StartedRefinement {
            session_id,
            question,
        })
    }

    /// Record one answer; returns either the next question or the refined
    /// goal once `MAX_SOCRATIC_QUESTIONS` answers have been given.
    ///
    /// Nothing is persisted if the gateway call fails, so a failed turn can
    /// be retried with the same answer.
    pub async fn respond(
        &self,
        session_id: &str,
        user_id: &str,
        answer: &str,
    ) -> Result<RefinementStep, RefineError> {
        let mut session = self
            .store
            .get(session_id)
            .await?
            .ok_or_else(|| RefineError::SessionNotFound(session_id.to_string()))?;

        if !session.is_owned_by(user_id) {
            return Err(RefineError::PermissionDenied(session_id.to_string()));
        }
        if session.status != SessionStatus::QuestioningStarted {
            return Err(RefineError::QuestioningClosed(session_id.to_string()));
        }

        let mut patches = vec![SessionPatch::PushUserResponse(answer.to_string())];
        SessionPatch::PushUserResponse(answer.to_string()).apply(&mut session);

        let step = if session.user_responses.len() >= MAX_SOCRATIC_QUESTIONS {
            debug!(session_id, "Questioning bound reached, synthesizing goal");
            let refined_goal = complete_role(
                self.gateway.as_ref(),
                &self.registry,
                AdvisoryRole::Summarizer,
                &PromptTemplate::refine_goal(&session.transcript()),
            )
            .await?;

            patches.push(SessionPatch::RefinedGoal(refined_goal.clone()));
            patches.push(SessionPatch::Status(SessionStatus::QuestioningCompleted));
            RefinementStep::Complete { refined_goal }
        } else {
            let question = complete_role(
                self.gateway.as_ref(),
                &self.registry,
                AdvisoryRole::SocraticQuestioner,
                &PromptTemplate::next_question(&session.transcript()),
            )
            .await?;

            SessionPatch::PushQuestion(question.clone()).apply(&mut session);
            patches.push(SessionPatch::PushQuestion(question.clone()));
            RefinementStep::NextQuestion(question)
        };

        debug_assert!(session.questioning_within_bounds());
        self.store.apply(session_id, patches).await?;
        Ok(step)
    }
}

/// Process-unique session id: millisecond timestamp plus a counter
fn new_session_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!(
        "sess-{:x}-{:x}",
        chrono::Utc::now().timestamp_millis(),
        n
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{FnGateway, MapSessionStore};

    fn refiner(
        gateway: FnGateway,
    ) -> (
        SocraticRefiner<FnGateway, MapSessionStore>,
        Arc<MapSessionStore>,
    ) {
        let store = Arc::new(MapSessionStore::new());
        let refiner = SocraticRefiner::new(
            Arc::new(gateway),
            Arc::clone(&store),
            Arc::new(PersonaRegistry::default()),
        );
        (refiner, store)
    }

    fn scripted_gateway() -> FnGateway {
        FnGateway::new(|_, messages, _| {
            let system = &messages[0].content;
            if system == AdvisoryRole::SocraticQuestioner.system_prompt() {
                Ok("What constraints matter most?".to_string())
            } else if system == AdvisoryRole::Summarizer.system_prompt() {
                Ok("A refined, panel-ready goal.".to_string())
            } else {
                panic!("unexpected role: {}", system)
            }
        })
    }

    #[tokio::test]
    async fn test_start_creates_session_with_opening_question() {
        let (refiner, store) = refiner(scripted_gateway());

        let started = refiner.start("user-1", "get into college").await.unwrap();
        assert_eq!(started.question, PromptTemplate::opening_question());

        let session = store.get(&started.session_id).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::QuestioningStarted);
        assert_eq!(session.questions.len(), 1);
        assert!(session.questioning_within_bounds());
    }

    #[tokio::test]
    async fn test_start_rejects_empty_goal() {
        let (refiner, _) = refiner(scripted_gateway());
        let result = refiner.start("user-1", "   ").await;
        assert!(matches!(result, Err(RefineError::InvalidGoal(_))));
    }

    #[tokio::test]
    async fn test_exactly_three_answers_complete_refinement() {
        let (refiner, store) = refiner(scripted_gateway());
        let started = refiner.start("user-1", "get into college").await.unwrap();
        let id = started.session_id;

        for turn in 0..MAX_SOCRATIC_QUESTIONS {
            let step = refiner.respond(&id, "user-1", "my answer").await.unwrap();
            let session = store.get(&id).await.unwrap().unwrap();
            assert!(session.questioning_within_bounds());

            if turn + 1 < MAX_SOCRATIC_QUESTIONS {
                assert!(!step.is_complete());
            } else {
                match step {
                    RefinementStep::Complete { refined_goal } => {
                        assert_eq!(refined_goal, "A refined, panel-ready goal.");
                    }
                    other => panic!("expected completion, got {:?}", other),
                }
                assert_eq!(session.status, SessionStatus::QuestioningCompleted);
                assert_eq!(session.refined_goal.as_deref(), Some("A refined, panel-ready goal."));
            }
        }

        let session = store.get(&id).await.unwrap().unwrap();
        assert_eq!(session.questions.len(), MAX_SOCRATIC_QUESTIONS);
        assert_eq!(session.user_responses.len(), MAX_SOCRATIC_QUESTIONS);
    }

    #[tokio::test]
    async fn test_respond_after_completion_is_rejected() {
        let (refiner, _) = refiner(scripted_gateway());
        let started = refiner.start("user-1", "get into college").await.unwrap();
        for _ in 0..MAX_SOCRATIC_QUESTIONS {
            refiner
                .respond(&started.session_id, "user-1", "answer")
                .await
                .unwrap();
        }

        let result = refiner.respond(&started.session_id, "user-1", "extra").await;
        assert!(matches!(result, Err(RefineError::QuestioningClosed(_))));
    }

    #[tokio::test]
    async fn test_respond_rejects_foreign_user() {
        let (refiner, _) = refiner(scripted_gateway());
        let started = refiner.start("user-1", "get into college").await.unwrap();

        let result = refiner.respond(&started.session_id, "user-2", "answer").await;
        assert!(matches!(result, Err(RefineError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn test_respond_unknown_session() {
        let (refiner, _) = refiner(scripted_gateway());
        let result = refiner.respond("missing", "user-1", "answer").await;
        assert!(matches!(result, Err(RefineError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_gateway_failure_persists_nothing() {
        let (refiner, store) = refiner(FnGateway::new(|_, _, _| {
            Err(GatewayError::Upstream("provider down".to_string()))
        }));
        let started = refiner.start("user-1", "get into college").await.unwrap();

        let result = refiner.respond(&started.session_id, "user-1", "answer").await;
        assert!(matches!(result, Err(RefineError::Gateway(_))));

        // The failed turn left no partial state, so it can be retried
        let session = store.get(&started.session_id).await.unwrap().unwrap();
        assert!(session.user_responses.is_empty());
        assert_eq!(session.questions.len(), 1);
    }

    #[tokio::test]
    async fn test_follow_up_uses_questioner_model() {
        let expected =
            PersonaRegistry::default().model_for_role(AdvisoryRole::SocraticQuestioner);
        let seen = Arc::new(std::sync::Mutex::new(None));
        let seen_in = Arc::clone(&seen);
        let gateway = FnGateway::new(move |model, _, _| {
            *seen_in.lock().unwrap() = Some(model.clone());
            Ok("next question".to_string())
        });
        let (refiner, _) = refiner(gateway);

        let started = refiner.start("user-1", "goal").await.unwrap();
        refiner
            .respond(&started.session_id, "user-1", "answer")
            .await
            .unwrap();
        assert_eq!(seen.lock().unwrap().clone(), Some(expected));
    }
}
