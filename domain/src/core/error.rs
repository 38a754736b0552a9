//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Goal must not be empty")]
    EmptyGoal,

    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("Unknown advisory role: {0}")]
    UnknownRole(String),

    #[error("No JSON object found in response")]
    NoJsonObject,

    #[error("Malformed JSON payload: {0}")]
    MalformedJson(String),
}

impl DomainError {
    /// Check if this error represents a violated JSON contract
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            DomainError::NoJsonObject | DomainError::MalformedJson(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_check() {
        assert!(DomainError::NoJsonObject.is_malformed());
        assert!(DomainError::MalformedJson("oops".to_string()).is_malformed());
        assert!(!DomainError::EmptyGoal.is_malformed());
    }
}
