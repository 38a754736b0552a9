//! Content moderation types and the keyword screening tier
//!
//! The keyword tier is pure text matching with no I/O or hidden state.
//! Word-boundary matching prevents substrings inside longer words from
//! false-positiving ("skill" must not trip on "kill"). The AI tier lives
//! in the application layer, behind the gateway.

mod keywords;

pub use keywords::DENYLIST;

use serde::{Deserialize, Serialize};

/// The tier that produced a moderation verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationLevel {
    /// Keyword denylist + spam heuristics
    Basic,
    /// AI contextual filter
    Ai,
    /// AI tier unavailable; degraded verdict
    Fallback,
}

impl ModerationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationLevel::Basic => "basic",
            ModerationLevel::Ai => "ai",
            ModerationLevel::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for ModerationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verdict of a moderation call; produced fresh per call, never mutated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationResult {
    pub approved: bool,
    pub level: ModerationLevel,
    pub reasons: Vec<String>,
    /// 0-100, AI tier only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
}

impl ModerationResult {
    pub fn approved_basic() -> Self {
        Self {
            approved: true,
            level: ModerationLevel::Basic,
            reasons: Vec::new(),
            confidence: None,
        }
    }

    pub fn rejected_basic(reasons: Vec<String>) -> Self {
        Self {
            approved: false,
            level: ModerationLevel::Basic,
            reasons,
            confidence: None,
        }
    }

    pub fn ai(approved: bool, confidence: u8, reasons: Vec<String>) -> Self {
        Self {
            approved,
            level: ModerationLevel::Ai,
            reasons,
            confidence: Some(confidence.min(100)),
        }
    }

    /// Degraded verdict when the AI tier is unreachable
    pub fn fallback(approved: bool) -> Self {
        Self {
            approved,
            level: ModerationLevel::Fallback,
            reasons: vec!["moderation unavailable".to_string()],
            confidence: Some(0),
        }
    }
}

/// Candidate content submitted for moderation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSubmission {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl ContentSubmission {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tags: Vec::new(),
            owner_id: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    fn text_fields(&self) -> impl Iterator<Item = &str> {
        [self.name.as_str(), self.description.as_str()]
            .into_iter()
            .chain(self.tags.iter().map(String::as_str))
    }
}

/// Run the keyword screening tier against a submission.
///
/// Deterministic: identical content always yields an identical verdict.
pub fn keyword_screen(content: &ContentSubmission) -> ModerationResult {
    let mut reasons = Vec::new();

    for text in content.text_fields() {
        if text.is_empty() {
            continue;
        }
        let lower = text.to_lowercase();
        for keyword in DENYLIST {
            let reason = format!("Contains blocked keyword: '{}'", keyword);
            if contains_word(&lower, keyword) && !reasons.contains(&reason) {
                reasons.push(reason);
            }
        }
        for reason in spam_signals(text) {
            if !reasons.contains(&reason) {
                reasons.push(reason);
            }
        }
    }

    if reasons.is_empty() {
        ModerationResult::approved_basic()
    } else {
        ModerationResult::rejected_basic(reasons)
    }
}

/// Word-boundary containment check.
///
/// A match counts only when the keyword is not flanked by alphanumeric
/// characters, so "kill" matches "kill the lights" but not "skill".
fn contains_word(haystack: &str, word: &str) -> bool {
    let mut search_from = 0;
    while let Some(pos) = haystack[search_from..].find(word) {
        let start = search_from + pos;
        let end = start + word.len();

        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());

        if before_ok && after_ok {
            return true;
        }
        search_from = start + 1;
    }
    false
}

/// Heuristic spam signals: shouting, link farms, address harvesting
fn spam_signals(text: &str) -> Vec<String> {
    let mut reasons = Vec::new();

    let caps_words = text
        .split_whitespace()
        .filter(|w| w.len() >= 4 && w.chars().all(|c| c.is_uppercase() || !c.is_alphabetic()))
        .filter(|w| w.chars().any(|c| c.is_uppercase()))
        .count();
    if caps_words > 3 {
        reasons.push("Excessive capitalized words".to_string());
    }

    let url_count = text.matches("http://").count() + text.matches("https://").count();
    if url_count > 3 {
        reasons.push(format!("Excessive URLs ({})", url_count));
    }

    let email_count = text
        .split_whitespace()
        .filter(|w| {
            w.split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
        })
        .count();
    if email_count > 2 {
        reasons.push(format!("Excessive email addresses ({})", email_count));
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standalone_keyword_rejected() {
        let content = ContentSubmission::new("Fight Club", "we kill time after school");
        let result = keyword_screen(&content);
        assert!(!result.approved);
        assert_eq!(result.level, ModerationLevel::Basic);
        assert!(result.reasons.iter().any(|r| r.contains("'kill'")));
    }

    #[test]
    fn test_substring_not_rejected() {
        let content = ContentSubmission::new("Skill Share", "develop a new skill every week");
        let result = keyword_screen(&content);
        assert!(result.approved, "reasons: {:?}", result.reasons);
    }

    #[test]
    fn test_keyword_in_tag_rejected() {
        let content = ContentSubmission::new("Club", "a normal club")
            .with_tags(vec!["fun".to_string(), "scam".to_string()]);
        let result = keyword_screen(&content);
        assert!(!result.approved);
        assert!(result.reasons.iter().any(|r| r.contains("'scam'")));
    }

    #[test]
    fn test_keyword_screen_is_deterministic() {
        let content = ContentSubmission::new("Club", "violence is not the answer");
        let first = keyword_screen(&content);
        let second = keyword_screen(&content);
        assert_eq!(first.approved, second.approved);
        assert_eq!(first.reasons, second.reasons);
    }

    #[test]
    fn test_punctuation_is_a_boundary() {
        let content = ContentSubmission::new("Club", "do not spam!");
        let result = keyword_screen(&content);
        assert!(!result.approved);
    }

    #[test]
    fn test_excessive_urls_flagged() {
        let description = "https://a.com https://b.com https://c.com https://d.com visit all";
        let result = keyword_screen(&ContentSubmission::new("Links", description));
        assert!(!result.approved);
        assert!(result.reasons.iter().any(|r| r.contains("URLs")));
    }

    #[test]
    fn test_spam_signals_apply_to_name() {
        let content =
            ContentSubmission::new("FREE MONEY CLICK HERE TODAY", "a perfectly calm description");
        let result = keyword_screen(&content);
        assert!(!result.approved);
        assert!(result.reasons.iter().any(|r| r.contains("capitalized")));
    }

    #[test]
    fn test_spam_signals_apply_to_tags() {
        let content = ContentSubmission::new("Links", "one link is fine").with_tags(vec![
            "https://a.com https://b.com https://c.com https://d.com".to_string(),
        ]);
        let result = keyword_screen(&content);
        assert!(!result.approved);
        assert!(result.reasons.iter().any(|r| r.contains("URLs")));
    }

    #[test]
    fn test_excessive_emails_flagged() {
        let description = "contact a@x.com b@y.org c@z.net today";
        let result = keyword_screen(&ContentSubmission::new("Contact", description));
        assert!(!result.approved);
        assert!(result.reasons.iter().any(|r| r.contains("email")));
    }

    #[test]
    fn test_clean_content_approved() {
        let content = ContentSubmission::new(
            "Robotics Club",
            "Weekly meetings to build and program robots together.",
        );
        let result = keyword_screen(&content);
        assert!(result.approved);
        assert!(result.reasons.is_empty());
        assert!(result.confidence.is_none());
    }
}
