//! Herald CLI - watch a long-running job through its progress feed
//!
//! This CLI provides a `herald` command that plays the presentation layer:
//! it runs a simulated database load in the background, renders each
//! progress report it publishes, and forwards cancellation requests back.

mod commands;
mod config;
mod load_job;
mod strings;

use clap::{CommandFactory, Parser, Subcommand};
use commands::run::RunOptions;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const DEFAULT_BATCHES: u32 = 5;
const DEFAULT_STEP_MS: u64 = 400;

/// Herald CLI - progress reporting for cancelable background jobs
#[derive(Parser, Debug)]
#[command(
    name = "herald",
    author,
    version,
    about = "Herald - progress reporting for cancelable background jobs",
    long_about = "Herald runs a background job and renders the progress reports it publishes.\nPress Ctrl+C while a step is cancelable to ask the job to stop."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the simulated database load and render its progress
    Run {
        /// Number of entry batches to load
        #[arg(long)]
        batches: Option<u32>,

        /// Delay between steps in milliseconds
        #[arg(long)]
        step_ms: Option<u64>,

        /// Request cancellation after this many rendered reports
        #[arg(long)]
        cancel_after: Option<usize>,

        /// Simulate a failure when this entry batch is reached
        #[arg(long)]
        fail_after: Option<u32>,

        /// Output one JSON object per event
        #[arg(long)]
        json: bool,

        /// String table overriding the built-in texts
        #[arg(long)]
        strings: Option<PathBuf>,
    },

    /// Show the string table used to render reports
    Strings {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// String table overriding the built-in texts
        #[arg(long)]
        strings: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config,
}

fn parse_level(level: &str) -> Level {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let (cli_config, config_problems) = config::load_config();

    // Initialize tracing
    let level = parse_level(args.log_level.as_deref().or(cli_config.log_level.as_deref()).unwrap_or("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    for problem in &config_problems {
        tracing::warn!(error = %problem, "Ignoring configuration file");
    }

    // If no command provided, show help
    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    match command {
        Command::Run { batches, step_ms, cancel_after, fail_after, json, strings } => {
            let options = RunOptions {
                batches: batches.or(cli_config.batches).unwrap_or(DEFAULT_BATCHES),
                step: Duration::from_millis(step_ms.or(cli_config.step_ms).unwrap_or(DEFAULT_STEP_MS)),
                cancel_after,
                fail_after,
                json: json || cli_config.wants_json(),
                strings: strings.or_else(|| cli_config.strings.clone()),
            };
            commands::run::execute(options).await?;
        }
        Command::Strings { json, strings } => {
            let strings = strings.or_else(|| cli_config.strings.clone());
            commands::strings::execute(strings.as_deref(), json || cli_config.wants_json())?;
        }
        Command::Config => {
            commands::config::execute(&cli_config)?;
        }
    }

    Ok(())
}
