//! Ports (interfaces) consumed by the use cases
//!
//! Implementations (adapters) live in the infrastructure and presentation
//! layers.

pub mod audit;
pub mod model_gateway;
pub mod progress;
pub mod session_store;
pub mod task_queue;
