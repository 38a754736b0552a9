//! File-backed configuration schema
//!
//! Everything has a default so a missing config file is never an error;
//! the API key may also come from the environment.

use conclave_domain::{AdvisoryRole, DomainError, Model, Persona, PersonaRegistry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub gateway: GatewaySettings,
    pub debate: DebateSettings,
    pub moderation: ModerationSettings,
    pub models: ModelSettings,
    pub audit: AuditSettings,
}

/// `[gateway]` section: provider endpoint and resilience knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Falls back to the `OPENROUTER_API_KEY` environment variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

impl GatewaySettings {
    /// File value wins over the environment so a config file can pin a key
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
    }
}

/// `[debate]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebateSettings {
    pub max_consensus_rounds: usize,
}

impl Default for DebateSettings {
    fn default() -> Self {
        Self {
            max_consensus_rounds: 2,
        }
    }
}

/// `[moderation]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationSettings {
    /// Approve (true) or reject (false) when the AI tier is unreachable
    pub fail_open: bool,
}

impl Default for ModerationSettings {
    fn default() -> Self {
        Self { fail_open: true }
    }
}

/// `[models]` section: per-persona and per-role model overrides, keyed by
/// persona/role id with OpenRouter model identifiers as values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub personas: HashMap<String, String>,
    pub roles: HashMap<String, String>,
}

impl ModelSettings {
    /// Build a persona registry from the overrides.
    ///
    /// Unknown persona or role ids are rejected rather than silently
    /// ignored; a typo in a config file should be loud.
    pub fn build_registry(&self) -> Result<PersonaRegistry, DomainError> {
        let mut registry = PersonaRegistry::default();
        for (id, model) in &self.personas {
            let persona: Persona = id.parse()?;
            registry = registry.with_persona_model(persona, parse_model(model));
        }
        for (id, model) in &self.roles {
            let role: AdvisoryRole = id.parse()?;
            registry = registry.with_role_model(role, parse_model(model));
        }
        Ok(registry)
    }
}

fn parse_model(s: &str) -> Model {
    // FromStr is infallible; unknown ids become Model::Custom
    s.parse().unwrap_or_default()
}

/// `[audit]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSettings {
    /// JSONL audit trail destination; audit is disabled when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.gateway.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.gateway.max_retries, 2);
        assert_eq!(config.debate.max_consensus_rounds, 2);
        assert!(config.moderation.fail_open);
        assert!(config.audit.path.is_none());
    }

    #[test]
    fn test_configured_api_key_wins_over_environment() {
        let settings = GatewaySettings {
            api_key: Some("sk-from-file".to_string()),
            ..GatewaySettings::default()
        };
        assert_eq!(settings.resolved_api_key().as_deref(), Some("sk-from-file"));
    }

    #[test]
    fn test_registry_overrides() {
        let mut settings = ModelSettings::default();
        settings
            .personas
            .insert("hr_manager".to_string(), "mistral/mistral-large".to_string());
        settings
            .roles
            .insert("mediator".to_string(), "deepseek/deepseek-chat".to_string());

        let registry = settings.build_registry().unwrap();
        assert_eq!(
            registry.model_for(Persona::HrManager).as_str(),
            "mistral/mistral-large"
        );
        assert_eq!(
            registry.model_for_role(AdvisoryRole::Mediator),
            Model::DeepseekChat
        );
        // Untouched personas keep their defaults
        assert_eq!(
            registry.model_for(Persona::AdmissionsOfficer),
            Persona::AdmissionsOfficer.default_model()
        );
    }

    #[test]
    fn test_registry_rejects_unknown_ids() {
        let mut settings = ModelSettings::default();
        settings
            .personas
            .insert("chief_vibes_officer".to_string(), "x".to_string());
        assert!(settings.build_registry().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let toml = r#"
            [gateway]
            timeout_secs = 30

            [moderation]
            fail_open = false

            [models.personas]
            peer_student = "qwen/qwen-2.5-72b-instruct"
        "#;
        let config: FileConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.gateway.timeout_secs, 30);
        assert_eq!(config.gateway.max_retries, 2);
        assert!(!config.moderation.fail_open);
        assert_eq!(config.models.personas.len(), 1);
    }
}
