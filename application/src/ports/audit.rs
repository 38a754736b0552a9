//! Audit trail and usage bookkeeping ports
//!
//! Both are best-effort side channels: implementations swallow and log
//! their own failures, and callers never let them fail a pipeline.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use conclave_domain::ModerationResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One append-only audit entry per moderation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationAuditEntry {
    pub timestamp: DateTime<Utc>,
    /// Subject name of the moderated content
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub result: ModerationResult,
    /// The tier that produced the final verdict
    pub deciding_tier: String,
}

impl ModerationAuditEntry {
    pub fn new(
        subject: impl Into<String>,
        owner_id: Option<String>,
        result: ModerationResult,
        deciding_tier: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            subject: subject.into(),
            owner_id,
            result,
            deciding_tier: deciding_tier.into(),
        }
    }
}

/// Immutable record of a completed analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub user_id: String,
    pub session_id: String,
    pub completed_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
            completed_at: Utc::now(),
        }
    }
}

/// Append-only audit trail
///
/// Fire-and-forget: implementations must not propagate their own failures.
pub trait AuditLog: Send + Sync {
    fn record_moderation(&self, entry: ModerationAuditEntry);

    fn record_analysis(&self, record: AnalysisRecord);
}

/// Audit log that discards everything
pub struct NullAuditLog;

impl AuditLog for NullAuditLog {
    fn record_moderation(&self, _entry: ModerationAuditEntry) {}
    fn record_analysis(&self, _record: AnalysisRecord) {}
}

/// Errors from the usage ledger
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Ledger I/O error: {0}")]
    Io(String),
}

/// Free-tier usage bookkeeping
#[async_trait]
pub trait UsageLedger: Send + Sync {
    /// Decrement the user's remaining analysis credit, if they are on the
    /// free plan and have credits left. A no-op otherwise.
    async fn consume_credit(&self, user_id: &str) -> Result<(), LedgerError>;
}

/// Ledger that tracks nothing
pub struct NullLedger;

#[async_trait]
impl UsageLedger for NullLedger {
    async fn consume_credit(&self, _user_id: &str) -> Result<(), LedgerError> {
        Ok(())
    }
}
