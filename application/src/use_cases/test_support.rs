//! Shared test doubles for the use-case tests

use crate::ports::model_gateway::{CompletionOptions, GatewayError, ModelGateway};
use crate::ports::session_store::{SessionStore, StoreError};
use async_trait::async_trait;
use conclave_domain::{DeliberationSession, Message, Model, SessionPatch};
use std::collections::HashMap;
use std::sync::RwLock;

type GatewayFn =
    dyn Fn(&Model, &[Message], CompletionOptions) -> Result<String, GatewayError> + Send + Sync;

/// Gateway double driven by a routing closure.
///
/// Responses fan out concurrently, so scripted sequences are unreliable;
/// tests route on the model or the system prompt instead.
pub struct FnGateway {
    f: Box<GatewayFn>,
}

impl FnGateway {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Model, &[Message], CompletionOptions) -> Result<String, GatewayError>
            + Send
            + Sync
            + 'static,
    {
        Self { f: Box::new(f) }
    }
}

#[async_trait]
impl ModelGateway for FnGateway {
    async fn complete(
        &self,
        model: &Model,
        messages: &[Message],
        options: CompletionOptions,
    ) -> Result<String, GatewayError> {
        (self.f)(model, messages, options)
    }
}

/// In-memory session store backed by a plain map
pub struct MapSessionStore {
    sessions: RwLock<HashMap<String, DeliberationSession>>,
}

impl MapSessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for MapSessionStore {
    async fn create(&self, session: DeliberationSession) -> Result<(), StoreError> {
        self.sessions
            .write()
            .unwrap()
            .insert(session.id.clone(), session);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<DeliberationSession>, StoreError> {
        Ok(self.sessions.read().unwrap().get(id).cloned())
    }

    async fn apply(&self, id: &str, patches: Vec<SessionPatch>) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().unwrap();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        for patch in patches {
            patch.apply(session);
        }
        Ok(())
    }
}
