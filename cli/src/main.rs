//! CLI entrypoint for conclave
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use conclave_application::{
    AuditLog, DebateEngine, DebateJob, ModerationClassifier, ProgressNotifier, RefinementStep,
    SessionStore, SocraticRefiner, TaskQueue, TaskState,
};
use conclave_domain::ContentSubmission;
use conclave_infrastructure::{
    ConfigLoader, FileConfig, JsonlAuditLog, LocalTaskQueue, MemorySessionStore,
    MemoryUsageLedger, OpenRouterGateway,
};
use conclave_presentation::{Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Could not load configuration")?
    };

    info!("Starting conclave");

    match cli.command {
        Command::Advise { goal, user, output } => {
            run_advise(&config, &goal, &user, output, cli.quiet).await
        }
        Command::Moderate {
            name,
            description,
            tags,
        } => run_moderate(&config, name, description, tags).await,
    }
}

async fn run_advise(
    config: &FileConfig,
    goal: &str,
    user: &str,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let registry = Arc::new(config.models.build_registry()?);
    let gateway = Arc::new(OpenRouterGateway::new(&config.gateway)?);
    let store = Arc::new(MemorySessionStore::new());
    let ledger = Arc::new(MemoryUsageLedger::new());
    ledger.ensure_account(user);

    // Socratic refinement on stdin
    let refiner = SocraticRefiner::new(
        Arc::clone(&gateway),
        Arc::clone(&store),
        Arc::clone(&registry),
    );
    let started = refiner.start(user, goal).await?;
    let session_id = started.session_id;

    let mut question = started.question;
    let refined_goal = loop {
        let answer = prompt_answer(&question)?;
        match refiner.respond(&session_id, user, &answer).await? {
            RefinementStep::NextQuestion(next) => question = next,
            RefinementStep::Complete { refined_goal } => break refined_goal,
        }
    };

    if !quiet {
        println!();
        println!("Refined goal: {}", refined_goal);
        println!();
    }

    // Debate runs through the task queue, observed by polling
    let mut engine = DebateEngine::new(gateway, Arc::clone(&store), registry)
        .with_ledger(ledger)
        .with_max_rounds(config.debate.max_consensus_rounds);
    if let Some(audit) = audit_log(config) {
        engine = engine.with_audit(audit);
    }

    let mut queue = LocalTaskQueue::new(Arc::new(engine));
    if !quiet {
        queue = queue.with_notifier(Arc::new(ProgressReporter::new()) as Arc<dyn ProgressNotifier>);
    }

    let handle = queue
        .enqueue(DebateJob {
            user_id: user.to_string(),
            refined_goal,
            session_id: session_id.clone(),
        })
        .await?;

    loop {
        tokio::time::sleep(Duration::from_millis(200)).await;
        match queue.status(&handle).await {
            Some(TaskState::Succeeded { .. }) => break,
            Some(TaskState::Failed { error }) => bail!("Deliberation failed: {}", error),
            Some(_) => continue,
            None => bail!("Debate task disappeared from the queue"),
        }
    }

    let session = store
        .get(&session_id)
        .await?
        .context("Completed session missing from store")?;

    let rendered = match output {
        OutputFormat::Full => ConsoleFormatter::format(&session),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&session),
        OutputFormat::Json => ConsoleFormatter::format_json(&session),
    };
    println!("{}", rendered);

    Ok(())
}

async fn run_moderate(
    config: &FileConfig,
    name: String,
    description: String,
    tags: Vec<String>,
) -> Result<()> {
    let registry = Arc::new(config.models.build_registry()?);
    let gateway = Arc::new(OpenRouterGateway::new(&config.gateway)?);

    let mut classifier = ModerationClassifier::new(gateway, registry)
        .with_fail_open(config.moderation.fail_open);
    if let Some(audit) = audit_log(config) {
        classifier = classifier.with_audit(audit);
    }

    let submission = ContentSubmission::new(name, description).with_tags(tags);
    let result = classifier.classify(&submission).await;
    print!("{}", ConsoleFormatter::format_moderation(&result));

    if !result.approved {
        std::process::exit(1);
    }
    Ok(())
}

fn audit_log(config: &FileConfig) -> Option<Arc<dyn AuditLog>> {
    let path = config.audit.path.as_ref()?;
    JsonlAuditLog::new(path).map(|log| Arc::new(log) as Arc<dyn AuditLog>)
}

/// Ask one question and read the answer from stdin, skipping blank lines
fn prompt_answer(question: &str) -> Result<String> {
    println!("{}", question);
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut answer = String::new();
        let read = std::io::stdin().read_line(&mut answer)?;
        if read == 0 {
            bail!("stdin closed before questioning finished");
        }
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}
