//! Model Gateway port
//!
//! Defines the interface for invoking backing LLM models. Adapters in the
//! infrastructure layer own retry/backoff, timeouts, and authentication.

use async_trait::async_trait;
use conclave_domain::{
    AdvisoryRole, DomainError, Message, Model, Persona, PersonaRegistry, decode_json_object,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur during gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Unknown persona/model or missing credentials; fatal, never retried
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote call failed after exhausting retries
    #[error("Upstream call failed: {0}")]
    Upstream(String),

    /// Provider violated the structured-JSON contract
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<DomainError> for GatewayError {
    fn from(err: DomainError) -> Self {
        GatewayError::MalformedResponse(err.to_string())
    }
}

/// Per-call completion options
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider for a JSON object; the reply is still treated as
    /// untrusted free-form text when decoding
    pub json_mode: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
            json_mode: false,
        }
    }
}

impl CompletionOptions {
    pub fn json() -> Self {
        Self {
            json_mode: true,
            ..Self::default()
        }
    }
}

/// Gateway for model invocation
///
/// This port defines how the application layer reaches the model inference
/// provider. The provider is treated as unreliable: timeouts, rate limits,
/// and malformed payloads are expected operating conditions.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send a conversation to a model and return the reply text
    async fn complete(
        &self,
        model: &Model,
        messages: &[Message],
        options: CompletionOptions,
    ) -> Result<String, GatewayError>;
}

/// Invoke a persona: its registry system prompt plus one user message
pub async fn complete_persona<G: ModelGateway + ?Sized>(
    gateway: &G,
    registry: &PersonaRegistry,
    persona: Persona,
    user_message: &str,
) -> Result<String, GatewayError> {
    let model = registry.model_for(persona);
    let messages = [
        Message::system(persona.system_prompt()),
        Message::user(user_message),
    ];
    gateway
        .complete(&model, &messages, CompletionOptions::default())
        .await
}

/// Invoke an advisory role for free-form text
pub async fn complete_role<G: ModelGateway + ?Sized>(
    gateway: &G,
    registry: &PersonaRegistry,
    role: AdvisoryRole,
    user_message: &str,
) -> Result<String, GatewayError> {
    let model = registry.model_for_role(role);
    let messages = [
        Message::system(role.system_prompt()),
        Message::user(user_message),
    ];
    gateway
        .complete(&model, &messages, CompletionOptions::default())
        .await
}

/// Invoke an advisory role under the structured-JSON contract and decode
/// the embedded object into `T`
pub async fn complete_role_json<T, G>(
    gateway: &G,
    registry: &PersonaRegistry,
    role: AdvisoryRole,
    user_message: &str,
) -> Result<T, GatewayError>
where
    T: DeserializeOwned,
    G: ModelGateway + ?Sized,
{
    let model = registry.model_for_role(role);
    let messages = [
        Message::system(role.system_prompt()),
        Message::user(user_message),
    ];
    let reply = gateway
        .complete(&model, &messages, CompletionOptions::json())
        .await?;
    Ok(decode_json_object(&reply)?)
}
