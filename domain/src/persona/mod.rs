//! Persona definitions and the registry mapping them to models
//!
//! A persona is a named analytical viewpoint bound to a system prompt and a
//! backing model. Four primary analysts conduct the round table; a designated
//! critic plays devil's advocate. Functional roles (questioner, summarizer,
//! analyzer, mediator, moderator) are resolved the same way but do not hold
//! seats at the table.

mod prompts;
mod registry;

pub use registry::PersonaRegistry;

use crate::core::error::DomainError;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// A named analytical viewpoint participating in deliberation (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Academic and admissions perspective
    AdmissionsOfficer,
    /// Peer-to-peer student perspective
    PeerStudent,
    /// Professional career perspective
    HrManager,
    /// Humanistic, values-driven perspective
    PhilosophicalAdvisor,
    /// Devil's advocate; never joins the round table as an analyst
    CriticalAnalyst,
}

impl Persona {
    /// Get the string identifier for this persona
    pub fn id(&self) -> &'static str {
        match self {
            Persona::AdmissionsOfficer => "admissions_officer",
            Persona::PeerStudent => "peer_student",
            Persona::HrManager => "hr_manager",
            Persona::PhilosophicalAdvisor => "philosophical_advisor",
            Persona::CriticalAnalyst => "critical_analyst",
        }
    }

    /// The four primary analysts seated at the round table
    pub fn primaries() -> [Persona; 4] {
        [
            Persona::AdmissionsOfficer,
            Persona::PeerStudent,
            Persona::HrManager,
            Persona::PhilosophicalAdvisor,
        ]
    }

    /// The designated devil's advocate
    pub fn critic() -> Persona {
        Persona::CriticalAnalyst
    }

    /// System prompt establishing this persona's viewpoint
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Persona::AdmissionsOfficer => prompts::ADMISSIONS_OFFICER,
            Persona::PeerStudent => prompts::PEER_STUDENT,
            Persona::HrManager => prompts::HR_MANAGER,
            Persona::PhilosophicalAdvisor => prompts::PHILOSOPHICAL_ADVISOR,
            Persona::CriticalAnalyst => prompts::CRITICAL_ANALYST,
        }
    }

    /// Default backing model for this persona
    pub fn default_model(&self) -> Model {
        match self {
            Persona::AdmissionsOfficer => Model::DeepseekChat,
            Persona::PeerStudent => Model::ClaudeOpus,
            Persona::HrManager => Model::Qwen25,
            Persona::PhilosophicalAdvisor => Model::GlmAir,
            Persona::CriticalAnalyst => Model::Grok4,
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for Persona {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admissions_officer" => Ok(Persona::AdmissionsOfficer),
            "peer_student" => Ok(Persona::PeerStudent),
            "hr_manager" => Ok(Persona::HrManager),
            "philosophical_advisor" => Ok(Persona::PhilosophicalAdvisor),
            "critical_analyst" => Ok(Persona::CriticalAnalyst),
            other => Err(DomainError::UnknownPersona(other.to_string())),
        }
    }
}

/// A functional role resolved to a model without a seat at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvisoryRole {
    /// Generates follow-up questions during Socratic refinement
    SocraticQuestioner,
    /// Synthesizes a transcript into a refined goal
    Summarizer,
    /// Judges whether the analysts have reached consensus (JSON contract)
    ConsensusAnalyzer,
    /// Synthesizes a balanced compromise when consensus is not reached
    Mediator,
    /// Contextual content moderation (JSON contract)
    Moderator,
}

impl AdvisoryRole {
    pub fn id(&self) -> &'static str {
        match self {
            AdvisoryRole::SocraticQuestioner => "socratic_questioner",
            AdvisoryRole::Summarizer => "summarizer",
            AdvisoryRole::ConsensusAnalyzer => "consensus_analyzer",
            AdvisoryRole::Mediator => "mediator",
            AdvisoryRole::Moderator => "moderator",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            AdvisoryRole::SocraticQuestioner => prompts::SOCRATIC_QUESTIONER,
            AdvisoryRole::Summarizer => prompts::SUMMARIZER,
            AdvisoryRole::ConsensusAnalyzer => prompts::CONSENSUS_ANALYZER,
            AdvisoryRole::Mediator => prompts::MEDIATOR,
            AdvisoryRole::Moderator => prompts::MODERATOR,
        }
    }

    pub fn default_model(&self) -> Model {
        match self {
            // Analytic plumbing runs on the cheap workhorse model;
            // the mediator gets a stronger model for the final synthesis.
            AdvisoryRole::SocraticQuestioner => Model::DeepseekChat,
            AdvisoryRole::Summarizer => Model::DeepseekChat,
            AdvisoryRole::ConsensusAnalyzer => Model::DeepseekChat,
            AdvisoryRole::Mediator => Model::ClaudeOpus,
            AdvisoryRole::Moderator => Model::DeepseekChat,
        }
    }
}

impl std::fmt::Display for AdvisoryRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for AdvisoryRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "socratic_questioner" => Ok(AdvisoryRole::SocraticQuestioner),
            "summarizer" => Ok(AdvisoryRole::Summarizer),
            "consensus_analyzer" => Ok(AdvisoryRole::ConsensusAnalyzer),
            "mediator" => Ok(AdvisoryRole::Mediator),
            "moderator" => Ok(AdvisoryRole::Moderator),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primaries_exclude_critic() {
        let primaries = Persona::primaries();
        assert_eq!(primaries.len(), 4);
        assert!(!primaries.contains(&Persona::critic()));
    }

    #[test]
    fn test_persona_id_roundtrip() {
        for persona in Persona::primaries()
            .into_iter()
            .chain([Persona::critic()])
        {
            let parsed: Persona = persona.id().parse().unwrap();
            assert_eq!(parsed, persona);
        }
    }

    #[test]
    fn test_unknown_persona_rejected() {
        let err = "astrologer".parse::<Persona>().unwrap_err();
        assert!(err.to_string().contains("astrologer"));
    }
}
