//! Session entities and the typed update whitelist

pub mod entities;
pub mod patch;

pub use entities::{
    ConsensusOutcome, DeliberationSession, MAX_SOCRATIC_QUESTIONS, PersonaRecord, SessionStatus,
};
pub use patch::SessionPatch;
