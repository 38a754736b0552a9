//! Progress notification port
//!
//! Reports phase boundaries and per-persona task completion during a debate
//! run. Implementations live in the presentation layer (console spinner)
//! and in the task queue adapter (status hook).

use conclave_domain::DebatePhase;

/// Callback for progress updates during debate execution
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &DebatePhase, total_tasks: usize);

    /// Called when a task completes within a phase
    fn on_task_complete(&self, phase: &DebatePhase, participant: &str, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &DebatePhase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &DebatePhase, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &DebatePhase, _participant: &str, _success: bool) {}
    fn on_phase_complete(&self, _phase: &DebatePhase) {}
}

/// Fan out progress events to multiple notifiers
pub struct CompositeProgress {
    notifiers: Vec<std::sync::Arc<dyn ProgressNotifier>>,
}

impl CompositeProgress {
    pub fn new(notifiers: Vec<std::sync::Arc<dyn ProgressNotifier>>) -> Self {
        Self { notifiers }
    }
}

impl ProgressNotifier for CompositeProgress {
    fn on_phase_start(&self, phase: &DebatePhase, total_tasks: usize) {
        for n in &self.notifiers {
            n.on_phase_start(phase, total_tasks);
        }
    }

    fn on_task_complete(&self, phase: &DebatePhase, participant: &str, success: bool) {
        for n in &self.notifiers {
            n.on_task_complete(phase, participant, success);
        }
    }

    fn on_phase_complete(&self, phase: &DebatePhase) {
        for n in &self.notifiers {
            n.on_phase_complete(phase);
        }
    }
}
