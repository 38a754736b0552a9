//! Model value object representing a backing LLM model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Backing LLM models (Value Object)
///
/// A domain concept naming the concrete models that personas resolve to.
/// The string form is the provider-side model identifier sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    DeepseekChat,
    ClaudeOpus,
    Qwen25,
    GlmAir,
    Grok4,
    /// Any other provider model id, passed through verbatim
    Custom(String),
}

impl Model {
    /// Get the provider model identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::DeepseekChat => "deepseek/deepseek-chat",
            Model::ClaudeOpus => "anthropic/claude-3-opus",
            Model::Qwen25 => "qwen/qwen-2.5-72b",
            Model::GlmAir => "glm-4.5-air",
            Model::Grok4 => "xai/grok-4",
            Model::Custom(s) => s,
        }
    }
}

impl Default for Model {
    /// Returns the default workhorse model
    fn default() -> Self {
        Model::DeepseekChat
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "deepseek/deepseek-chat" => Model::DeepseekChat,
            "anthropic/claude-3-opus" => Model::ClaudeOpus,
            "qwen/qwen-2.5-72b" => Model::Qwen25,
            "glm-4.5-air" => Model::GlmAir,
            "xai/grok-4" => Model::Grok4,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap())
    }
}
