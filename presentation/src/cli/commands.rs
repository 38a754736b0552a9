//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for deliberation results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full formatted output with all phases
    Full,
    /// Only the final recommendation
    Summary,
    /// JSON output
    Json,
}

/// CLI arguments for conclave
#[derive(Parser, Debug)]
#[command(name = "conclave")]
#[command(author, version, about = "Multi-persona deliberation over your goals")]
#[command(long_about = r#"
Conclave refines a vague goal through Socratic questioning, then convenes a
panel of AI advisor personas to debate it and converge on a recommendation.

The deliberation has three phases:
1. Round Table: every advisor analyzes the refined goal in parallel
2. Critique: a devil's advocate challenges the analyses
3. Consensus: advisors revise until they agree, or a mediator decides

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./conclave.toml     Project-level config
3. ~/.config/conclave/config.toml   Global config

Example:
  conclave advise "I want to get into a good college"
  conclave moderate --name "Chess Club" --description "We play chess weekly"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long, global = true)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Refine a goal through Socratic questioning, then run the debate
    Advise {
        /// The goal to deliberate on
        goal: String,

        /// User identity the session is recorded under
        #[arg(long, default_value = "local")]
        user: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "full")]
        output: OutputFormat,
    },

    /// Screen content through the two-tier moderation pipeline
    Moderate {
        /// Content name
        #[arg(long)]
        name: String,

        /// Content description
        #[arg(long)]
        description: String,

        /// Content tags (can be specified multiple times)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },
}
