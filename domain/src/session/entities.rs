//! Deliberation session entities
//!
//! A [`DeliberationSession`] is the central entity of the Socratic/debate
//! workflow. It is created when refinement begins, mutated by every phase,
//! and never deleted by the core.

use crate::persona::Persona;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upper bound on Socratic follow-up questions per session
pub const MAX_SOCRATIC_QUESTIONS: usize = 3;

/// Lifecycle status of a session
///
/// Monotonic except for `Failed`, which can occur at any point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    QuestioningStarted,
    QuestioningCompleted,
    DebateInProgress,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::QuestioningStarted => "questioning_started",
            SessionStatus::QuestioningCompleted => "questioning_completed",
            SessionStatus::DebateInProgress => "debate_in_progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }

    /// Check if the session can accept further writes
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-persona state within a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critique: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Terminal consensus outcome, set exactly once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusOutcome {
    pub reached: bool,
    pub final_recommendation: String,
    pub reasoning: String,
}

impl ConsensusOutcome {
    pub fn reached(recommendation: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            reached: true,
            final_recommendation: recommendation.into(),
            reasoning: reasoning.into(),
        }
    }

    pub fn compromise(recommendation: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            reached: false,
            final_recommendation: recommendation.into(),
            reasoning: reasoning.into(),
        }
    }
}

/// The central entity of the Socratic/debate workflow (Entity)
///
/// # Invariants
///
/// - `user_responses.len() <= questions.len() <= MAX_SOCRATIC_QUESTIONS`
/// - `refined_goal` is set iff the session has passed refinement
/// - `consensus` is set iff `status == Completed`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliberationSession {
    pub id: String,
    pub user_id: String,
    pub initial_goal: String,
    /// Prompts asked so far (append-only)
    pub questions: Vec<String>,
    /// Answers, index-aligned with `questions`
    pub user_responses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refined_goal: Option<String>,
    #[serde(default)]
    pub personas: BTreeMap<Persona, PersonaRecord>,
    /// Snapshot of the last round's responses, written with `consensus`
    #[serde(default)]
    pub final_responses: BTreeMap<Persona, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consensus: Option<ConsensusOutcome>,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeliberationSession {
    /// Create a session at the start of refinement, with the opening question
    /// already asked
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        initial_goal: impl Into<String>,
        first_question: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            initial_goal: initial_goal.into(),
            questions: vec![first_question.into()],
            user_responses: Vec::new(),
            refined_goal: None,
            personas: BTreeMap::new(),
            final_responses: BTreeMap::new(),
            consensus: None,
            status: SessionStatus::QuestioningStarted,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the session is owned by the given user
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Check the Socratic bound invariant
    pub fn questioning_within_bounds(&self) -> bool {
        self.user_responses.len() <= self.questions.len()
            && self.questions.len() <= MAX_SOCRATIC_QUESTIONS
    }

    /// Render the question/answer history as a transcript for prompting
    pub fn transcript(&self) -> String {
        let mut out = format!("Initial Goal: {}\n\n", self.initial_goal);
        for (i, question) in self.questions.iter().enumerate() {
            out.push_str(&format!("Q: {}\n", question));
            if let Some(answer) = self.user_responses.get(i) {
                out.push_str(&format!("A: {}\n", answer));
            }
        }
        out
    }

    /// Get or create the record for a persona
    pub fn persona_record_mut(&mut self, persona: Persona) -> &mut PersonaRecord {
        self.personas.entry(persona).or_default()
    }
}
