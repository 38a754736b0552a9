//! Moderation Classifier use case
//!
//! Two-tier content screening: the deterministic keyword tier first, then a
//! contextual AI tier behind the gateway. Classification never fails; a
//! dead gateway produces a degraded fallback verdict instead.

use crate::ports::audit::{AuditLog, ModerationAuditEntry, NullAuditLog};
use crate::ports::model_gateway::{ModelGateway, complete_role_json};
use conclave_domain::{
    AdvisoryRole, ContentSubmission, ModerationResult, ModerationVerdict, PersonaRegistry,
    PromptTemplate, keyword_screen,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Use case for two-tier content moderation
pub struct ModerationClassifier<G: ModelGateway + 'static> {
    gateway: Arc<G>,
    registry: Arc<PersonaRegistry>,
    audit: Arc<dyn AuditLog>,
    /// Whether an unreachable AI tier approves (true) or rejects (false)
    fail_open: bool,
}

impl<G: ModelGateway + 'static> ModerationClassifier<G> {
    pub fn new(gateway: Arc<G>, registry: Arc<PersonaRegistry>) -> Self {
        Self {
            gateway,
            registry,
            audit: Arc::new(NullAuditLog),
            fail_open: true,
        }
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_fail_open(mut self, fail_open: bool) -> Self {
        self.fail_open = fail_open;
        self
    }

    /// Classify a submission. Always returns a verdict and always leaves an
    /// audit entry, whichever tier decides.
    pub async fn classify(&self, submission: &ContentSubmission) -> ModerationResult {
        let basic = keyword_screen(submission);
        if !basic.approved {
            debug!(name = %submission.name, "Rejected by keyword tier");
            self.record(submission, &basic);
            return basic;
        }

        let result = match complete_role_json::<ModerationVerdict, _>(
            self.gateway.as_ref(),
            &self.registry,
            AdvisoryRole::Moderator,
            &PromptTemplate::moderation(&submission.name, &submission.description),
        )
        .await
        {
            Ok(verdict) => {
                ModerationResult::ai(verdict.approved, verdict.confidence, verdict.reasons)
            }
            Err(e) => {
                warn!(
                    name = %submission.name,
                    fail_open = self.fail_open,
                    "AI moderation unavailable, degrading: {}", e
                );
                ModerationResult::fallback(self.fail_open)
            }
        };

        self.record(submission, &result);
        result
    }

    fn record(&self, submission: &ContentSubmission, result: &ModerationResult) {
        self.audit.record_moderation(ModerationAuditEntry::new(
            &submission.name,
            submission.owner_id.clone(),
            result.clone(),
            result.level.as_str(),
        ));
    }
}
