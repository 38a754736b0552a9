//! Audit trail adapters

mod jsonl;

pub use jsonl::JsonlAuditLog;
