//! Debate value objects - transient values flowing through the engine

use crate::persona::Persona;
use crate::session::ConsensusOutcome;
use serde::{Deserialize, Serialize};

/// A phase of the deliberation pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebatePhase {
    /// Phase A: independent analysis from every primary persona
    RoundTable,
    /// Phase B: devil's advocate critique of the round table
    Critique,
    /// Phase C: one revision + consensus-check round (1-indexed)
    ConsensusRound(usize),
    /// Fallback: mediator synthesizes a compromise after exhaustion
    Compromise,
}

impl std::fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebatePhase::RoundTable => write!(f, "round_table"),
            DebatePhase::Critique => write!(f, "critique"),
            DebatePhase::ConsensusRound(n) => write!(f, "consensus_round_{}", n),
            DebatePhase::Compromise => write!(f, "compromise"),
        }
    }
}

/// One persona's response within a debate round (transient value)
///
/// Held by the engine while a run is in flight; persisted only as session
/// persona fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaResponse {
    pub persona: Persona,
    pub text: String,
    /// 0 = round table, 1.. = consensus revision rounds
    pub round: usize,
}

impl PersonaResponse {
    pub fn new(persona: Persona, text: impl Into<String>, round: usize) -> Self {
        Self {
            persona,
            text: text.into(),
            round,
        }
    }
}

/// Final outcome of a debate run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateOutcome {
    pub session_id: String,
    pub consensus: ConsensusOutcome,
    /// Consensus rounds actually executed
    pub rounds_used: usize,
}

impl DebateOutcome {
    pub fn new(session_id: impl Into<String>, consensus: ConsensusOutcome, rounds_used: usize) -> Self {
        Self {
            session_id: session_id.into(),
            consensus,
            rounds_used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(DebatePhase::RoundTable.to_string(), "round_table");
        assert_eq!(
            DebatePhase::ConsensusRound(2).to_string(),
            "consensus_round_2"
        );
        assert_eq!(DebatePhase::Compromise.to_string(), "compromise");
    }
}
