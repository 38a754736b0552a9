//! Fixed denylist for the keyword moderation tier

/// Terms that reject content outright at the keyword tier.
///
/// Matched case-insensitively with word boundaries.
pub const DENYLIST: &[&str] = &[
    "fuck",
    "shit",
    "asshole",
    "bitch",
    "cunt",
    "nigger",
    "retard",
    "porn",
    "sex",
    "xxx",
    "explicit",
    "hate",
    "violence",
    "kill",
    "murder",
    "suicide",
    "scam",
    "fraud",
    "phishing",
    "malware",
    "illegal",
    "drugs",
    "weapons",
    "guns",
    "spam",
    "advertisement",
];
