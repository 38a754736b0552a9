//! Infrastructure layer: adapters for the application ports
//!
//! Provider gateway, configuration, storage, audit trail, and task queue
//! implementations.

pub mod audit;
pub mod config;
pub mod openrouter;
pub mod queue;
pub mod store;

pub use audit::JsonlAuditLog;
pub use config::{ConfigLoader, FileConfig};
pub use openrouter::OpenRouterGateway;
pub use queue::LocalTaskQueue;
pub use store::{MemorySessionStore, MemoryUsageLedger};
