//! Structured-payload extraction from free-form model replies
//!
//! Models routinely wrap the JSON they were asked for in prose, markdown
//! fences, or trailing commentary. [`extract_json_object`] locates the first
//! `{` and scans to its matching `}` with a balanced-brace walk that is aware
//! of string literals and escapes, so nested objects and braces inside
//! strings do not confuse it. Pure domain logic, no I/O.

use crate::core::error::DomainError;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Extract the first complete JSON object embedded in `text`.
///
/// Returns the exact slice from the first `{` to its matching `}`, or `None`
/// when no balanced object exists. The slice is *not* validated as JSON;
/// callers decode it with serde.
///
/// # Examples
///
/// ```
/// use conclave_domain::debate::parsing::extract_json_object;
///
/// let reply = r#"Sure, here you go: {"approved": true, "confidence": 90} -- hope that helps"#;
/// assert_eq!(
///     extract_json_object(reply),
///     Some(r#"{"approved": true, "confidence": 90}"#)
/// );
/// assert_eq!(extract_json_object("no object here"), None);
/// ```
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    // Ran out of input before the object closed
    None
}

/// Extract and decode a JSON object of type `T` from a free-form reply.
pub fn decode_json_object<T: DeserializeOwned>(text: &str) -> Result<T, DomainError> {
    let slice = extract_json_object(text).ok_or(DomainError::NoJsonObject)?;
    serde_json::from_str(slice).map_err(|e| DomainError::MalformedJson(e.to_string()))
}

/// Analyzer verdict on whether the personas agree
///
/// `consensus` is the only required key; when the analyzer reports agreement
/// it must also supply the recommendation and reasoning, which
/// [`ConsensusVerdict::validate`] enforces.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsensusVerdict {
    pub consensus: bool,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub reasoning: String,
}

impl ConsensusVerdict {
    /// Reject verdicts that claim consensus but omit the recommendation
    pub fn validate(self) -> Result<Self, DomainError> {
        if self.consensus && self.recommendation.trim().is_empty() {
            return Err(DomainError::MalformedJson(
                "consensus=true without a recommendation".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Moderator verdict from the AI moderation tier
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationVerdict {
    pub approved: bool,
    #[serde(default)]
    pub confidence: u8,
    #[serde(default)]
    pub reasons: Vec<String>,
}
