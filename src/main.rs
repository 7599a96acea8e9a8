use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use taskboard::board::Board;
use taskboard::config::{self, Config};
use taskboard::store::{Priority, Store, TaskStatus};
use taskboard::tui;

#[derive(Parser)]
#[command(
    name = "taskboard",
    about = "Browse and triage tasks by status in the terminal",
    version = env!("TASKBOARD_VERSION")
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Seed for the generated tasks and comments
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of tasks to generate
    #[arg(long, global = true)]
    tasks: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the TUI board (default)
    Dashboard,
    /// Create ~/.taskboard/ with a default config.toml
    Init,
    /// Print the generated tasks
    List {
        /// Only tasks with this status (open, in-progress, closed)
        #[arg(short, long)]
        status: Option<TaskStatus>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show task counts by status and priority
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    config::ensure_dirs()?;
    init_tracing(&config::log_path()?, cli.verbose)?;

    let mut cfg = config::load()?;
    if let Some(seed) = cli.seed {
        cfg.fixtures.seed = Some(seed);
    }
    if let Some(count) = cli.tasks {
        cfg.fixtures.task_count = count;
    }

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Init => {
            let path = config::config_path()?;
            if config::write_default(&path)? {
                println!("taskboard initialized at {}", path.display());
            } else {
                println!("{} already exists; leaving it alone", path.display());
            }
            Ok(())
        }
        Commands::List { status, json } => {
            let store = Store::generate(&cfg.fixtures);
            let tasks: Vec<_> = store
                .tasks
                .get_all()
                .iter()
                .filter(|t| status.is_none_or(|s| t.status == s))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                for t in &tasks {
                    println!(
                        "  {:>4} {} {:<11} {:<7} {} [{}]",
                        t.id,
                        t.status.symbol(),
                        t.status.as_str(),
                        t.priority.as_str(),
                        t.name,
                        t.labels.join(", "),
                    );
                }
            }
            Ok(())
        }
        Commands::Stats => {
            let store = Store::generate(&cfg.fixtures);
            print_stats(&store);
            Ok(())
        }
        Commands::Dashboard => run_dashboard(&cfg),
    }
}

fn run_dashboard(cfg: &Config) -> Result<()> {
    let store = Store::generate(&cfg.fixtures);
    let board = Board::new(store, &cfg.board, Instant::now());
    tracing::info!(
        latency_ms = cfg.board.page_latency_ms,
        "starting dashboard"
    );
    tui::run(board, cfg)
}

fn print_stats(store: &Store) {
    let tasks = &store.tasks;
    println!("Tasks:      {}", tasks.len());
    for status in TaskStatus::ALL {
        println!("  {:<12}{}", status.label(), tasks.count_by_status(status));
    }
    println!("Priorities:");
    for priority in Priority::ALL {
        let count = tasks
            .get_all()
            .iter()
            .filter(|t| t.priority == priority)
            .count();
        println!("  {:<12}{}", priority.as_str(), count);
    }
    println!("Comments:   {}", store.comments.len());
}

/// Log to ~/.taskboard/taskboard.log; the terminal belongs to the TUI.
/// Log to `path`. A second call keeps the subscriber already installed.
fn init_tracing(path: &Path, verbose: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let default_level = if verbose { "debug" } else { "info" };
    // Ignore an unparseable RUST_LOG rather than refusing to start.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new(format!("taskboard={default_level}")));

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(filter)
        .try_init();
    if installed.is_err() {
        tracing::debug!(path = %path.display(), "tracing already initialised");
    }
    Ok(())
}
