//! Progress reporting for debate execution

use colored::Colorize;
use conclave_application::ProgressNotifier;
use conclave_domain::DebatePhase;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports debate progress with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-")
    }

    fn phase_display_name(phase: &DebatePhase) -> String {
        match phase {
            DebatePhase::RoundTable => "Phase A: Round Table".to_string(),
            DebatePhase::Critique => "Phase B: Critique".to_string(),
            DebatePhase::ConsensusRound(n) => format!("Phase C: Consensus (round {})", n),
            DebatePhase::Compromise => "Mediation".to_string(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &DebatePhase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_display_name(phase));
        pb.set_message("Starting...");

        *self.phase_bar.lock().unwrap() = Some(pb);
    }

    fn on_task_complete(&self, _phase: &DebatePhase, participant: &str, success: bool) {
        if let Some(pb) = self.phase_bar.lock().unwrap().as_ref() {
            let status = if success {
                format!("{} {}", "v".green(), participant)
            } else {
                format!("{} {}", "x".red(), participant)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: &DebatePhase) {
        if let Some(pb) = self.phase_bar.lock().unwrap().take() {
            pb.finish_with_message(format!(
                "{} complete",
                Self::phase_display_name(phase).green()
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &DebatePhase, total_tasks: usize) {
        println!(
            "{} {} ({} tasks)",
            "->".cyan(),
            ProgressReporter::phase_display_name(phase).bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, _phase: &DebatePhase, participant: &str, success: bool) {
        if success {
            println!("  {} {}", "v".green(), participant);
        } else {
            println!("  {} {} (failed)", "x".red(), participant);
        }
    }

    fn on_phase_complete(&self, _phase: &DebatePhase) {
        println!();
    }
}
