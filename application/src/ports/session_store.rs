//! Session store port
//!
//! The document store is the only shared mutable resource in the core.
//! The engine issues whole-document creates plus whitelisted field patches
//! ([`SessionPatch`]); it never merges free-form dictionaries.

use async_trait::async_trait;
use conclave_domain::{DeliberationSession, SessionPatch};
use thiserror::Error;

/// Errors from the session store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Store I/O error: {0}")]
    Io(String),
}

/// Durable session state (external collaborator)
///
/// Patches within a single `apply` call are applied in order. The store
/// makes no transactional guarantee across separate calls: a crash between
/// calls can leave a partially-updated phase, which external reconciliation
/// must handle.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session document
    async fn create(&self, session: DeliberationSession) -> Result<(), StoreError>;

    /// Fetch a session by id
    async fn get(&self, id: &str) -> Result<Option<DeliberationSession>, StoreError>;

    /// Apply whitelisted field updates to an existing session
    async fn apply(&self, id: &str, patches: Vec<SessionPatch>) -> Result<(), StoreError>;
}
