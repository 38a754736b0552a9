//! Goal value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A user goal submitted for deliberation (Value Object)
///
/// Holds either the raw initial goal or the refined goal produced by the
/// Socratic refinement flow. Always non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal(String);

impl Goal {
    /// Create a goal, rejecting empty or whitespace-only input
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyGoal);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn content(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_trims_whitespace() {
        let goal = Goal::new("  find a summer internship  ").unwrap();
        assert_eq!(goal.content(), "find a summer internship");
    }

    #[test]
    fn test_empty_goal_rejected() {
        assert!(Goal::new("   ").is_err());
        assert!(Goal::new("").is_err());
    }
}
