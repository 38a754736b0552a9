//! Domain layer for conclave
//!
//! This crate contains the core business logic, entities, and value objects
//! of the deliberation engine. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Deliberation
//!
//! A vague user goal is refined through Socratic dialogue, analyzed by a
//! round table of personas, challenged by a devil's advocate, and driven
//! toward consensus, falling back to a mediated compromise when the round
//! budget runs out.
//!
//! ## Personas
//!
//! Named analytical viewpoints bound to system prompts and backing models.
//! Four primary analysts plus one designated critic.

pub mod core;
pub mod debate;
pub mod moderation;
pub mod persona;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use core::{error::DomainError, goal::Goal, message::Message, message::Role, model::Model};
pub use debate::{
    ConsensusVerdict, DebateOutcome, DebatePhase, ModerationVerdict, PersonaResponse,
    decode_json_object, extract_json_object,
};
pub use moderation::{
    ContentSubmission, ModerationLevel, ModerationResult, keyword_screen,
};
pub use persona::{AdvisoryRole, Persona, PersonaRegistry};
pub use prompt::PromptTemplate;
pub use session::{
    ConsensusOutcome, DeliberationSession, MAX_SOCRATIC_QUESTIONS, PersonaRecord, SessionPatch,
    SessionStatus,
};
