//! OpenRouter adapter for the model gateway port

mod gateway;
pub mod protocol;

pub use gateway::OpenRouterGateway;
