//! Registry resolving personas and roles to backing models

use super::{AdvisoryRole, Persona};
use crate::core::model::Model;
use std::collections::HashMap;

/// Maps personas and advisory roles to their backing models (pure data)
///
/// Defaults come from [`Persona::default_model`] / [`AdvisoryRole::default_model`];
/// individual assignments can be overridden from configuration.
///
/// # Example
///
/// ```
/// use conclave_domain::persona::{Persona, PersonaRegistry};
/// use conclave_domain::core::model::Model;
///
/// let registry = PersonaRegistry::new()
///     .with_persona_model(Persona::HrManager, Model::Custom("mistral/mistral-large".into()));
/// assert_eq!(registry.model_for(Persona::HrManager).as_str(), "mistral/mistral-large");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PersonaRegistry {
    persona_overrides: HashMap<Persona, Model>,
    role_overrides: HashMap<AdvisoryRole, Model>,
}

impl PersonaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the backing model for a persona
    pub fn with_persona_model(mut self, persona: Persona, model: Model) -> Self {
        self.persona_overrides.insert(persona, model);
        self
    }

    /// Override the backing model for an advisory role
    pub fn with_role_model(mut self, role: AdvisoryRole, model: Model) -> Self {
        self.role_overrides.insert(role, model);
        self
    }

    /// Resolve the backing model for a persona
    pub fn model_for(&self, persona: Persona) -> Model {
        self.persona_overrides
            .get(&persona)
            .cloned()
            .unwrap_or_else(|| persona.default_model())
    }

    /// Resolve the backing model for an advisory role
    pub fn model_for_role(&self, role: AdvisoryRole) -> Model {
        self.role_overrides
            .get(&role)
            .cloned()
            .unwrap_or_else(|| role.default_model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve() {
        let registry = PersonaRegistry::new();
        assert_eq!(
            registry.model_for(Persona::AdmissionsOfficer),
            Model::DeepseekChat
        );
        assert_eq!(
            registry.model_for_role(AdvisoryRole::Mediator),
            Model::ClaudeOpus
        );
    }

    #[test]
    fn test_override_wins() {
        let registry = PersonaRegistry::new()
            .with_persona_model(Persona::CriticalAnalyst, Model::DeepseekChat)
            .with_role_model(AdvisoryRole::Moderator, Model::Grok4);
        assert_eq!(
            registry.model_for(Persona::CriticalAnalyst),
            Model::DeepseekChat
        );
        assert_eq!(
            registry.model_for_role(AdvisoryRole::Moderator),
            Model::Grok4
        );
        // Untouched entries keep their defaults
        assert_eq!(registry.model_for(Persona::PeerStudent), Model::ClaudeOpus);
    }
}
