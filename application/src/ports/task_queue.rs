//! Task queue port
//!
//! Debate runs execute off the caller's request path: the engine's `run` is
//! the task body, dispatched to a worker and observed by polling.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque handle to an enqueued task
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskHandle(pub String);

impl std::fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observable state of an enqueued task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TaskState {
    Queued,
    Running { phase: String },
    Succeeded { session_id: String },
    Failed { error: String },
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Succeeded { .. } | TaskState::Failed { .. })
    }
}

/// Arguments for a debate run task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateJob {
    pub user_id: String,
    pub refined_goal: String,
    pub session_id: String,
}

/// Errors from the task queue
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Task rejected: {0}")]
    Rejected(String),
}

/// Async job dispatch (external collaborator)
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Dispatch a debate run; returns immediately with a pollable handle
    async fn enqueue(&self, job: DebateJob) -> Result<TaskHandle, QueueError>;

    /// Poll the state of a previously enqueued task
    async fn status(&self, handle: &TaskHandle) -> Option<TaskState>;
}
