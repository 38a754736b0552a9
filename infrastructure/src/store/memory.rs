//! Process-local document store and usage ledger
//!
//! The deliberation core only ever creates whole documents and applies
//! whitelisted patches, so a `RwLock<HashMap>` is all the store needs.
//! Durability beyond the process lifetime is deliberately out of scope.

use async_trait::async_trait;
use conclave_application::{LedgerError, SessionStore, StoreError, UsageLedger};
use conclave_domain::{DeliberationSession, SessionPatch};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory session store
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, DeliberationSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: DeliberationSession) -> Result<(), StoreError> {
        debug!(session_id = %session.id, "Creating session");
        self.sessions
            .write()
            .map_err(|e| StoreError::Io(e.to_string()))?
            .insert(session.id.clone(), session);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<DeliberationSession>, StoreError> {
        Ok(self
            .sessions
            .read()
            .map_err(|e| StoreError::Io(e.to_string()))?
            .get(id)
            .cloned())
    }

    async fn apply(&self, id: &str, patches: Vec<SessionPatch>) -> Result<(), StoreError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        for patch in patches {
            debug!(session_id = id, field = %patch.field_path(), "Applying patch");
            patch.apply(session);
        }
        Ok(())
    }
}

/// Subscription plan for usage accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Free,
    Premium,
}

/// One user's usage account
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub plan: Plan,
    pub remaining_analyses: u32,
}

impl UserAccount {
    pub fn free(remaining_analyses: u32) -> Self {
        Self {
            plan: Plan::Free,
            remaining_analyses,
        }
    }

    pub fn premium() -> Self {
        Self {
            plan: Plan::Premium,
            remaining_analyses: 0,
        }
    }
}

/// Analyses granted to a fresh free account
pub const DEFAULT_FREE_ANALYSES: u32 = 3;

/// In-memory usage ledger
pub struct MemoryUsageLedger {
    accounts: RwLock<HashMap<String, UserAccount>>,
}

impl MemoryUsageLedger {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Create the account if it does not exist yet
    pub fn ensure_account(&self, user_id: &str) {
        self.accounts
            .write()
            .expect("ledger lock poisoned")
            .entry(user_id.to_string())
            .or_insert_with(|| UserAccount::free(DEFAULT_FREE_ANALYSES));
    }

    pub fn account(&self, user_id: &str) -> Option<UserAccount> {
        self.accounts
            .read()
            .expect("ledger lock poisoned")
            .get(user_id)
            .cloned()
    }
}

impl Default for MemoryUsageLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsageLedger for MemoryUsageLedger {
    async fn consume_credit(&self, user_id: &str) -> Result<(), LedgerError> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|e| LedgerError::Io(e.to_string()))?;
        let account = accounts
            .get_mut(user_id)
            .ok_or_else(|| LedgerError::UnknownUser(user_id.to_string()))?;

        if account.plan == Plan::Free && account.remaining_analyses > 0 {
            account.remaining_analyses -= 1;
            debug!(
                user_id,
                remaining = account.remaining_analyses,
                "Consumed analysis credit"
            );
        }
        Ok(())
    }
}
