//! Debate value objects and reply parsing

pub mod parsing;
pub mod value_objects;

pub use parsing::{ConsensusVerdict, ModerationVerdict, decode_json_object, extract_json_object};
pub use value_objects::{DebateOutcome, DebatePhase, PersonaResponse};
