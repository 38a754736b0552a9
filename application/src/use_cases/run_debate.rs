//! Debate Engine use case
//!
//! Orchestrates the full deliberation pipeline over a refined goal: the
//! round table (Phase A), the devil's advocate critique (Phase B), and the
//! bounded consensus loop with mediator fallback (Phase C).

use crate::ports::audit::{AnalysisRecord, AuditLog, NullAuditLog, NullLedger, UsageLedger};
use crate::ports::model_gateway::{
    GatewayError, ModelGateway, complete_persona, complete_role, complete_role_json,
};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::session_store::{SessionStore, StoreError};
use conclave_domain::{
    AdvisoryRole, ConsensusOutcome, ConsensusVerdict, DebateOutcome, DebatePhase, Persona,
    PersonaRegistry, PersonaResponse, PromptTemplate, SessionPatch, SessionStatus,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Upper bound on consensus rounds before the mediator takes over
pub const MAX_CONSENSUS_ITERATIONS: usize = 2;

/// Stand-in text for a persona whose model could not be reached
pub const UNAVAILABLE_SENTINEL: &str = "This advisor was unavailable for comment.";

/// Errors that can occur during a debate run
#[derive(Error, Debug)]
pub enum DebateError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Mediator synthesis failed: {0}")]
    MediationFailed(GatewayError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Use case for running a multi-persona debate
pub struct DebateEngine<G: ModelGateway + 'static, S: SessionStore + 'static> {
    gateway: Arc<G>,
    store: Arc<S>,
    registry: Arc<PersonaRegistry>,
    ledger: Arc<dyn UsageLedger>,
    audit: Arc<dyn AuditLog>,
    max_rounds: usize,
}

impl<G: ModelGateway + 'static, S: SessionStore + 'static> DebateEngine<G, S> {
    pub fn new(gateway: Arc<G>, store: Arc<S>, registry: Arc<PersonaRegistry>) -> Self {
        Self {
            gateway,
            store,
            registry,
            ledger: Arc::new(NullLedger),
            audit: Arc::new(NullAuditLog),
            max_rounds: MAX_CONSENSUS_ITERATIONS,
        }
    }

    pub fn with_ledger(mut self, ledger: Arc<dyn UsageLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    /// Execute the debate with default (no-op) progress
    pub async fn run(
        &self,
        user_id: &str,
        refined_goal: &str,
        session_id: &str,
    ) -> Result<DebateOutcome, DebateError> {
        self.run_with_progress(user_id, refined_goal, session_id, &NoProgress)
            .await
    }

    /// Execute the debate with progress callbacks
    pub async fn run_with_progress(
        &self,
        user_id: &str,
        refined_goal: &str,
        session_id: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<DebateOutcome, DebateError> {
        self.store
            .get(session_id)
            .await?
            .ok_or_else(|| DebateError::SessionNotFound(session_id.to_string()))?;

        self.store
            .apply(
                session_id,
                vec![SessionPatch::Status(SessionStatus::DebateInProgress)],
            )
            .await?;

        info!(session_id, "Debate started");
        match self.run_phases(refined_goal, session_id, progress).await {
            Ok(outcome) => {
                self.record_completion(user_id, session_id).await;
                Ok(outcome)
            }
            Err(e) => {
                // Best effort; the original error is the one worth surfacing
                let failed = self
                    .store
                    .apply(
                        session_id,
                        vec![
                            SessionPatch::Error(e.to_string()),
                            SessionPatch::Status(SessionStatus::Failed),
                        ],
                    )
                    .await;
                if let Err(store_err) = failed {
                    warn!(session_id, "Could not record failure: {}", store_err);
                }
                Err(e)
            }
        }
    }

    async fn run_phases(
        &self,
        refined_goal: &str,
        session_id: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<DebateOutcome, DebateError> {
        // Phase A
        let mut responses = self
            .phase_round_table(refined_goal, session_id, progress)
            .await?;

        // Phase B
        let critique = self.phase_critique(&responses, session_id, progress).await?;

        // Phase C
        for round in 1..=self.max_rounds {
            let phase = DebatePhase::ConsensusRound(round);
            progress.on_phase_start(&phase, Persona::primaries().len() + 1);

            responses = self
                .revise_responses(&responses, &critique, session_id, &phase, progress)
                .await?;

            match self.check_consensus(&responses).await {
                Some(verdict) if verdict.consensus => {
                    info!(session_id, round, "Consensus reached");
                    progress.on_task_complete(&phase, "consensus", true);
                    progress.on_phase_complete(&phase);

                    let outcome =
                        ConsensusOutcome::reached(verdict.recommendation, verdict.reasoning);
                    self.persist_outcome(session_id, &outcome, &responses).await?;
                    return Ok(DebateOutcome::new(session_id, outcome, round));
                }
                Some(_) => {
                    debug!(session_id, round, "No consensus yet");
                    progress.on_task_complete(&phase, "consensus", true);
                }
                None => {
                    progress.on_task_complete(&phase, "consensus", false);
                }
            }
            progress.on_phase_complete(&phase);
        }

        // Exhausted: a single mediator call decides
        let outcome = self
            .phase_compromise(&responses, session_id, progress)
            .await?;
        self.persist_outcome(session_id, &outcome, &responses).await?;
        Ok(DebateOutcome::new(session_id, outcome, self.max_rounds))
    }

    /// Phase A: query all primary personas in parallel.
    ///
    /// A persona whose model fails is represented by the sentinel text in
    /// the working set; only real responses are persisted.
    async fn phase_round_table(
        &self,
        refined_goal: &str,
        session_id: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<BTreeMap<Persona, String>, DebateError> {
        info!("Phase A: round table");
        let phase = DebatePhase::RoundTable;
        progress.on_phase_start(&phase, Persona::primaries().len());

        let mut join_set = JoinSet::new();
        for persona in Persona::primaries() {
            let gateway = Arc::clone(&self.gateway);
            let registry = Arc::clone(&self.registry);
            let prompt = PromptTemplate::round_table(refined_goal);

            join_set.spawn(async move {
                let result = complete_persona(gateway.as_ref(), &registry, persona, &prompt)
                    .await
                    .map(|text| PersonaResponse::new(persona, text, 0));
                (persona, result)
            });
        }

        let mut responses = BTreeMap::new();
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((persona, Ok(response))) => {
                    info!("Persona {} responded", persona);
                    progress.on_task_complete(&phase, persona.id(), true);
                    self.store
                        .apply(
                            session_id,
                            vec![SessionPatch::PersonaInitialResponse {
                                persona,
                                text: response.text.clone(),
                            }],
                        )
                        .await?;
                    responses.insert(persona, response.text);
                }
                Ok((persona, Err(e))) => {
                    warn!("Persona {} failed: {}", persona, e);
                    progress.on_task_complete(&phase, persona.id(), false);
                    responses.insert(persona, UNAVAILABLE_SENTINEL.to_string());
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        progress.on_phase_complete(&phase);
        Ok(responses)
    }

    /// Phase B: one critique call over all round-table responses.
    ///
    /// A failed critique degrades to an empty one; the debate still has
    /// value without the devil's advocate.
    async fn phase_critique(
        &self,
        responses: &BTreeMap<Persona, String>,
        session_id: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, DebateError> {
        info!("Phase B: critique");
        let phase = DebatePhase::Critique;
        let critic = Persona::critic();
        progress.on_phase_start(&phase, 1);

        let prompt = PromptTemplate::critique(responses);
        let critique = match complete_persona(
            self.gateway.as_ref(),
            &self.registry,
            critic,
            &prompt,
        )
        .await
        {
            Ok(text) => {
                progress.on_task_complete(&phase, critic.id(), true);
                self.store
                    .apply(
                        session_id,
                        Persona::primaries()
                            .into_iter()
                            .map(|persona| SessionPatch::PersonaCritique {
                                persona,
                                text: text.clone(),
                            })
                            .collect(),
                    )
                    .await?;
                text
            }
            Err(e) => {
                warn!("Critique failed, proceeding without it: {}", e);
                progress.on_task_complete(&phase, critic.id(), false);
                String::new()
            }
        };

        progress.on_phase_complete(&phase);
        Ok(critique)
    }

    /// One concurrent revision pass; a failed revision keeps the previous
    /// round's text.
    async fn revise_responses(
        &self,
        previous: &BTreeMap<Persona, String>,
        critique: &str,
        session_id: &str,
        phase: &DebatePhase,
        progress: &dyn ProgressNotifier,
    ) -> Result<BTreeMap<Persona, String>, DebateError> {
        let round = match phase {
            DebatePhase::ConsensusRound(n) => *n,
            _ => 0,
        };

        let mut join_set = JoinSet::new();
        for persona in Persona::primaries() {
            let gateway = Arc::clone(&self.gateway);
            let registry = Arc::clone(&self.registry);
            let own = previous.get(&persona).cloned().unwrap_or_default();
            let prompt = PromptTemplate::revision(&own, previous, critique);

            join_set.spawn(async move {
                let result = complete_persona(gateway.as_ref(), &registry, persona, &prompt)
                    .await
                    .map(|text| PersonaResponse::new(persona, text, round));
                (persona, result)
            });
        }

        let mut revised = previous.clone();
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((persona, Ok(response))) => {
                    progress.on_task_complete(phase, persona.id(), true);
                    self.store
                        .apply(
                            session_id,
                            vec![SessionPatch::PersonaRevisedResponse {
                                persona,
                                text: response.text.clone(),
                            }],
                        )
                        .await?;
                    revised.insert(persona, response.text);
                }
                Ok((persona, Err(e))) => {
                    warn!("Persona {} revision failed, keeping previous: {}", persona, e);
                    progress.on_task_complete(phase, persona.id(), false);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }
        Ok(revised)
    }

    /// Structured consensus check; any analyzer failure reads as "no
    /// consensus yet" rather than aborting the run
    async fn check_consensus(
        &self,
        responses: &BTreeMap<Persona, String>,
    ) -> Option<ConsensusVerdict> {
        let prompt = PromptTemplate::consensus_check(responses);
        match complete_role_json::<ConsensusVerdict, _>(
            self.gateway.as_ref(),
            &self.registry,
            AdvisoryRole::ConsensusAnalyzer,
            &prompt,
        )
        .await
        {
            Ok(verdict) => match verdict.validate() {
                Ok(verdict) => Some(verdict),
                Err(e) => {
                    warn!("Consensus verdict invalid: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Consensus check failed: {}", e);
                None
            }
        }
    }

    /// Mediator fallback after exhausting consensus rounds. Failure here is
    /// fatal; there is no safe default recommendation.
    async fn phase_compromise(
        &self,
        responses: &BTreeMap<Persona, String>,
        session_id: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<ConsensusOutcome, DebateError> {
        info!(session_id, "No consensus, invoking mediator");
        let phase = DebatePhase::Compromise;
        progress.on_phase_start(&phase, 1);

        let prompt = PromptTemplate::compromise(responses);
        let recommendation = complete_role(
            self.gateway.as_ref(),
            &self.registry,
            AdvisoryRole::Mediator,
            &prompt,
        )
        .await
        .map_err(DebateError::MediationFailed)?;

        progress.on_task_complete(&phase, "mediator", true);
        progress.on_phase_complete(&phase);

        Ok(ConsensusOutcome::compromise(
            recommendation,
            format!("no consensus after {} rounds", self.max_rounds),
        ))
    }

    async fn persist_outcome(
        &self,
        session_id: &str,
        outcome: &ConsensusOutcome,
        responses: &BTreeMap<Persona, String>,
    ) -> Result<(), DebateError> {
        self.store
            .apply(
                session_id,
                vec![
                    SessionPatch::FinalResponses(responses.clone()),
                    SessionPatch::Consensus(outcome.clone()),
                    SessionPatch::Status(SessionStatus::Completed),
                ],
            )
            .await?;
        Ok(())
    }

    /// Post-completion bookkeeping: swallow-and-log, never fails the run
    async fn record_completion(&self, user_id: &str, session_id: &str) {
        if let Err(e) = self.ledger.consume_credit(user_id).await {
            warn!(user_id, "Could not update usage ledger: {}", e);
        }
        self.audit
            .record_analysis(AnalysisRecord::new(user_id, session_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{FnGateway, MapSessionStore};
    use conclave_domain::{DeliberationSession, Model};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const GOAL: &str = "a refined goal";

    fn engine(
        gateway: FnGateway,
    ) -> (
        DebateEngine<FnGateway, MapSessionStore>,
        Arc<MapSessionStore>,
    ) {
        let store = Arc::new(MapSessionStore::new());
        let engine = DebateEngine::new(
            Arc::new(gateway),
            Arc::clone(&store),
            Arc::new(PersonaRegistry::default()),
        );
        (engine, store)
    }

    async fn seed_session(store: &MapSessionStore) -> String {
        let session = DeliberationSession::new("sess-1", "user-1", "raw goal", "Q1?");
        store.create(session).await.unwrap();
        "sess-1".to_string()
    }

    fn is_role(messages: &[conclave_domain::Message], role: AdvisoryRole) -> bool {
        messages[0].content == role.system_prompt()
    }

    #[tokio::test]
    async fn test_round_one_consensus_short_circuits() {
        let analyzer_calls = Arc::new(AtomicUsize::new(0));
        let mediator_calls = Arc::new(AtomicUsize::new(0));
        let a = Arc::clone(&analyzer_calls);
        let m = Arc::clone(&mediator_calls);

        let gateway = FnGateway::new(move |_, messages, _| {
            if is_role(messages, AdvisoryRole::ConsensusAnalyzer) {
                a.fetch_add(1, Ordering::SeqCst);
                Ok(r#"{"consensus": true, "recommendation": "do X", "reasoning": "aligned"}"#
                    .to_string())
            } else if is_role(messages, AdvisoryRole::Mediator) {
                m.fetch_add(1, Ordering::SeqCst);
                Ok("compromise".to_string())
            } else {
                Ok("expert analysis".to_string())
            }
        });

        let (engine, store) = engine(gateway);
        let id = seed_session(&store).await;

        let outcome = engine.run("user-1", GOAL, &id).await.unwrap();
        assert_eq!(outcome.rounds_used, 1);
        assert!(outcome.consensus.reached);
        assert_eq!(outcome.consensus.final_recommendation, "do X");
        assert_eq!(analyzer_calls.load(Ordering::SeqCst), 1);
        assert_eq!(mediator_calls.load(Ordering::SeqCst), 0);

        let session = store.get(&id).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert!(session.consensus.as_ref().unwrap().reached);
        assert_eq!(session.final_responses.len(), 4);
    }

    #[tokio::test]
    async fn test_exhaustion_invokes_mediator_exactly_once() {
        let mediator_calls = Arc::new(AtomicUsize::new(0));
        let m = Arc::clone(&mediator_calls);

        let gateway = FnGateway::new(move |_, messages, _| {
            if is_role(messages, AdvisoryRole::ConsensusAnalyzer) {
                Ok(r#"{"consensus": false}"#.to_string())
            } else if is_role(messages, AdvisoryRole::Mediator) {
                m.fetch_add(1, Ordering::SeqCst);
                Ok("the balanced middle path".to_string())
            } else {
                Ok("expert analysis".to_string())
            }
        });

        let (engine, store) = engine(gateway);
        let id = seed_session(&store).await;

        let outcome = engine.run("user-1", GOAL, &id).await.unwrap();
        assert_eq!(mediator_calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.rounds_used, MAX_CONSENSUS_ITERATIONS);
        assert!(!outcome.consensus.reached);
        assert_eq!(
            outcome.consensus.final_recommendation,
            "the balanced middle path"
        );
        assert!(outcome.consensus.reasoning.contains("no consensus after 2 rounds"));

        let session = store.get(&id).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
    }

    #[tokio::test]
    async fn test_round_table_failure_contained_with_sentinel() {
        let failing_model = PersonaRegistry::default().model_for(Persona::PhilosophicalAdvisor);

        let gateway = FnGateway::new(move |model: &Model, messages, _| {
            if is_role(messages, AdvisoryRole::ConsensusAnalyzer) {
                Ok(r#"{"consensus": true, "recommendation": "do X", "reasoning": "ok"}"#
                    .to_string())
            } else if *model == failing_model {
                Err(GatewayError::Upstream("timeout".to_string()))
            } else {
                Ok("expert analysis".to_string())
            }
        });

        let (engine, store) = engine(gateway);
        let id = seed_session(&store).await;

        let outcome = engine.run("user-1", GOAL, &id).await.unwrap();
        assert!(outcome.consensus.reached);

        let session = store.get(&id).await.unwrap().unwrap();
        // Only the three reachable personas were persisted in Phase A
        let initial_responses = session
            .personas
            .values()
            .filter(|r| r.initial_response.is_some())
            .count();
        assert_eq!(initial_responses, 3);
        assert!(session.personas.get(&Persona::PhilosophicalAdvisor).is_none_or(
            |r| r.initial_response.is_none()
        ));

        // The working set still carried all four voices into the final
        // snapshot, with the sentinel standing in for the silent one
        assert_eq!(session.final_responses.len(), 4);
        assert_eq!(
            session.final_responses[&Persona::PhilosophicalAdvisor],
            UNAVAILABLE_SENTINEL
        );
    }

    #[tokio::test]
    async fn test_critique_failure_degrades_and_run_completes() {
        let critic_model = PersonaRegistry::default().model_for(Persona::CriticalAnalyst);

        let gateway = FnGateway::new(move |model: &Model, messages, _| {
            if is_role(messages, AdvisoryRole::ConsensusAnalyzer) {
                Ok(r#"{"consensus": true, "recommendation": "do X", "reasoning": "ok"}"#
                    .to_string())
            } else if *model == critic_model {
                Err(GatewayError::Upstream("rate limited".to_string()))
            } else {
                Ok("expert analysis".to_string())
            }
        });

        let (engine, store) = engine(gateway);
        let id = seed_session(&store).await;

        let outcome = engine.run("user-1", GOAL, &id).await.unwrap();
        assert!(outcome.consensus.reached);

        let session = store.get(&id).await.unwrap().unwrap();
        assert!(session.personas.values().all(|r| r.critique.is_none()));
        assert_eq!(session.status, SessionStatus::Completed);
    }

    #[tokio::test]
    async fn test_mediator_failure_marks_session_failed() {
        let gateway = FnGateway::new(|_, messages, _| {
            if is_role(messages, AdvisoryRole::ConsensusAnalyzer) {
                Ok(r#"{"consensus": false}"#.to_string())
            } else if is_role(messages, AdvisoryRole::Mediator) {
                Err(GatewayError::Upstream("provider down".to_string()))
            } else {
                Ok("expert analysis".to_string())
            }
        });

        let (engine, store) = engine(gateway);
        let id = seed_session(&store).await;

        let result = engine.run("user-1", GOAL, &id).await;
        assert!(matches!(result, Err(DebateError::MediationFailed(_))));

        let session = store.get(&id).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Failed);
        assert!(session.error.as_deref().unwrap().contains("provider down"));
    }

    #[tokio::test]
    async fn test_unknown_session_rejected_before_any_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let gateway = FnGateway::new(move |_, _, _| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok("unused".to_string())
        });

        let (engine, _) = engine(gateway);
        let result = engine.run("user-1", GOAL, "missing").await;
        assert!(matches!(result, Err(DebateError::SessionNotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_consensus_payload_reads_as_no_consensus() {
        let gateway = FnGateway::new(|_, messages, _| {
            if is_role(messages, AdvisoryRole::ConsensusAnalyzer) {
                Ok("I believe they agree, more or less.".to_string())
            } else if is_role(messages, AdvisoryRole::Mediator) {
                Ok("compromise".to_string())
            } else {
                Ok("expert analysis".to_string())
            }
        });

        let (engine, store) = engine(gateway);
        let id = seed_session(&store).await;

        let outcome = engine.run("user-1", GOAL, &id).await.unwrap();
        assert!(!outcome.consensus.reached);
        assert_eq!(outcome.rounds_used, MAX_CONSENSUS_ITERATIONS);
    }
}
