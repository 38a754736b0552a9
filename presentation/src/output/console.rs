//! Console output formatter for deliberation results

use colored::Colorize;
use conclave_domain::{DeliberationSession, ModerationResult, Persona};

/// Formats completed sessions and moderation verdicts for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete session: refinement transcript, per-persona
    /// positions, and the outcome
    pub fn format(session: &DeliberationSession) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Conclave Deliberation"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Initial goal:".cyan().bold(),
            session.initial_goal
        ));
        if let Some(refined) = &session.refined_goal {
            output.push_str(&format!("{} {}\n", "Refined goal:".cyan().bold(), refined));
        }
        output.push('\n');

        if !session.questions.is_empty() {
            output.push_str(&Self::section_header("Socratic Refinement"));
            for (i, question) in session.questions.iter().enumerate() {
                output.push_str(&format!("\n{} {}\n", "Q:".bold(), question));
                if let Some(answer) = session.user_responses.get(i) {
                    output.push_str(&format!("{} {}\n", "A:".bold(), answer));
                }
            }
        }

        if !session.personas.is_empty() {
            output.push_str(&Self::section_header("Advisor Positions"));
            for (persona, record) in &session.personas {
                output.push_str(&format!(
                    "\n{}\n",
                    format!("── {} ──", Self::persona_display(*persona))
                        .yellow()
                        .bold()
                ));
                match (&record.revised_response, &record.initial_response) {
                    (Some(revised), _) => output.push_str(&format!("{}\n", revised)),
                    (None, Some(initial)) => output.push_str(&format!("{}\n", initial)),
                    (None, None) => output.push_str(&format!("{}\n", "(no response)".dimmed())),
                }
            }

            if let Some(critique) = session
                .personas
                .values()
                .find_map(|r| r.critique.as_deref())
                && !critique.is_empty()
            {
                output.push_str(&Self::section_header("Devil's Advocate"));
                output.push_str(&format!("\n{}\n", critique));
            }
        }

        output.push_str(&Self::outcome_section(session));
        output.push_str(&Self::footer());
        output
    }

    /// Format only the outcome (concise output)
    pub fn format_summary(session: &DeliberationSession) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n\n", "=== Conclave Recommendation ===".cyan().bold()));

        if let Some(refined) = &session.refined_goal {
            output.push_str(&format!("{} {}\n\n", "Goal:".bold(), refined));
        }

        match &session.consensus {
            Some(outcome) => {
                output.push_str(&format!("{}\n", outcome.final_recommendation));
            }
            None => {
                output.push_str(&format!(
                    "{}\n",
                    format!("Session ended in state: {}", session.status).yellow()
                ));
            }
        }
        output
    }

    /// Format as JSON
    pub fn format_json(session: &DeliberationSession) -> String {
        serde_json::to_string_pretty(session).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a moderation verdict
    pub fn format_moderation(result: &ModerationResult) -> String {
        let mut output = String::new();
        let verdict = if result.approved {
            "APPROVED".green().bold()
        } else {
            "REJECTED".red().bold()
        };
        output.push_str(&format!("{} (tier: {})\n", verdict, result.level));

        if let Some(confidence) = result.confidence {
            output.push_str(&format!("Confidence: {}%\n", confidence));
        }
        if !result.reasons.is_empty() {
            output.push_str("Reasons:\n");
            for reason in &result.reasons {
                output.push_str(&format!("  * {}\n", reason));
            }
        }
        output
    }

    fn outcome_section(session: &DeliberationSession) -> String {
        let mut output = Self::section_header("Outcome");
        match &session.consensus {
            Some(outcome) => {
                let label = if outcome.reached {
                    "Consensus reached".green().bold()
                } else {
                    "Mediated compromise".yellow().bold()
                };
                output.push_str(&format!(
                    "\n{}\n\n{}\n\n{} {}\n",
                    label,
                    outcome.final_recommendation,
                    "Reasoning:".dimmed(),
                    outcome.reasoning
                ));
            }
            None => {
                output.push_str(&format!(
                    "\n{}\n",
                    format!("No outcome (status: {})", session.status).red()
                ));
                if let Some(error) = &session.error {
                    output.push_str(&format!("{} {}\n", "Error:".red().bold(), error));
                }
            }
        }
        output
    }

    fn persona_display(persona: Persona) -> &'static str {
        match persona {
            Persona::AdmissionsOfficer => "Admissions Officer",
            Persona::PeerStudent => "Peer Student",
            Persona::HrManager => "HR Manager",
            Persona::PhilosophicalAdvisor => "Philosophical Advisor",
            Persona::CriticalAnalyst => "Critical Analyst",
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
