//! Application layer: use cases and ports
//!
//! Orchestrates the domain model through ports implemented by the
//! infrastructure and presentation layers. Depends only on the domain.

pub mod ports;
pub mod use_cases;

pub use ports::audit::{
    AnalysisRecord, AuditLog, LedgerError, ModerationAuditEntry, NullAuditLog, NullLedger,
    UsageLedger,
};
pub use ports::model_gateway::{CompletionOptions, GatewayError, ModelGateway};
pub use ports::progress::{CompositeProgress, NoProgress, ProgressNotifier};
pub use ports::session_store::{SessionStore, StoreError};
pub use ports::task_queue::{DebateJob, QueueError, TaskHandle, TaskQueue, TaskState};
pub use use_cases::{
    DebateEngine, DebateError, MAX_CONSENSUS_ITERATIONS, ModerationClassifier, RefineError,
    RefinementStep, SocraticRefiner, StartedRefinement, UNAVAILABLE_SENTINEL,
};
