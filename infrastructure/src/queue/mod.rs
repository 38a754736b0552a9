//! Task queue adapters

mod local;

pub use local::LocalTaskQueue;
