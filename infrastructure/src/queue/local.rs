//! Tokio-backed local task queue
//!
//! Runs each debate as a spawned task and exposes its state through a
//! shared status map. The queue's own progress hook mirrors phase
//! boundaries into `TaskState::Running` so pollers can watch a run move.

use async_trait::async_trait;
use conclave_application::{
    CompositeProgress, DebateEngine, DebateJob, ModelGateway, ProgressNotifier, QueueError,
    SessionStore, TaskHandle, TaskQueue, TaskState,
};
use conclave_domain::DebatePhase;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::info;

type StatusMap = Arc<RwLock<HashMap<TaskHandle, TaskState>>>;

/// In-process task queue executing debate runs on the tokio runtime
pub struct LocalTaskQueue<G: ModelGateway + 'static, S: SessionStore + 'static> {
    engine: Arc<DebateEngine<G, S>>,
    statuses: StatusMap,
    notifier: Option<Arc<dyn ProgressNotifier>>,
    counter: AtomicU64,
}

impl<G: ModelGateway + 'static, S: SessionStore + 'static> LocalTaskQueue<G, S> {
    pub fn new(engine: Arc<DebateEngine<G, S>>) -> Self {
        Self {
            engine,
            statuses: Arc::new(RwLock::new(HashMap::new())),
            notifier: None,
            counter: AtomicU64::new(0),
        }
    }

    /// Attach an additional progress notifier (e.g. a console reporter)
    /// that observes the same events as the status hook
    pub fn with_notifier(mut self, notifier: Arc<dyn ProgressNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }
}

#[async_trait]
impl<G: ModelGateway + 'static, S: SessionStore + 'static> TaskQueue for LocalTaskQueue<G, S> {
    async fn enqueue(&self, job: DebateJob) -> Result<TaskHandle, QueueError> {
        let handle = TaskHandle(format!("task-{}", self.counter.fetch_add(1, Ordering::Relaxed)));
        self.statuses
            .write()
            .map_err(|e| QueueError::Rejected(e.to_string()))?
            .insert(handle.clone(), TaskState::Queued);

        let hook: Arc<dyn ProgressNotifier> = Arc::new(StatusHook {
            handle: handle.clone(),
            statuses: Arc::clone(&self.statuses),
        });
        let progress: Arc<dyn ProgressNotifier> = match &self.notifier {
            Some(outer) => Arc::new(CompositeProgress::new(vec![hook, Arc::clone(outer)])),
            None => hook,
        };

        let engine = Arc::clone(&self.engine);
        let statuses = Arc::clone(&self.statuses);
        let task_handle = handle.clone();

        info!(handle = %handle, session_id = %job.session_id, "Debate task enqueued");
        tokio::spawn(async move {
            let result = engine
                .run_with_progress(
                    &job.user_id,
                    &job.refined_goal,
                    &job.session_id,
                    progress.as_ref(),
                )
                .await;

            let state = match result {
                Ok(outcome) => TaskState::Succeeded {
                    session_id: outcome.session_id,
                },
                Err(e) => TaskState::Failed {
                    error: e.to_string(),
                },
            };
            if let Ok(mut map) = statuses.write() {
                map.insert(task_handle, state);
            }
        });

        Ok(handle)
    }

    async fn status(&self, handle: &TaskHandle) -> Option<TaskState> {
        self.statuses.read().ok()?.get(handle).cloned()
    }
}

/// Mirrors phase starts into the status map
struct StatusHook {
    handle: TaskHandle,
    statuses: StatusMap,
}

impl ProgressNotifier for StatusHook {
    fn on_phase_start(&self, phase: &DebatePhase, _total_tasks: usize) {
        if let Ok(mut map) = self.statuses.write() {
            map.insert(
                self.handle.clone(),
                TaskState::Running {
                    phase: phase.to_string(),
                },
            );
        }
    }

    fn on_task_complete(&self, _phase: &DebatePhase, _participant: &str, _success: bool) {}

    fn on_phase_complete(&self, _phase: &DebatePhase) {}
}
