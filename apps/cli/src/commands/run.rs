//! Run command implementation.
//!
//! Starts the simulated database load, renders every progress report the
//! feed delivers, and turns Ctrl+C into a cancellation request whenever the
//! current report allows one.

use crate::load_job::DatabaseLoadJob;
use crate::strings::StringTable;
use anyhow::{Result, bail};
use colored::Colorize;
use herald_core::{CancelOutcome, ProgressReport, RenderedReport, TaskOutcome};
use herald_feed::{FeedUpdate, JobRunner};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Ctrl+C presses after which the command stops waiting for the job.
const MAX_INTERRUPTS: usize = 3;

/// Options for `herald run`, after config and flags are merged.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub batches: u32,
    pub step: Duration,
    pub cancel_after: Option<usize>,
    pub fail_after: Option<u32>,
    pub json: bool,
    pub strings: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum RunEvent<'a> {
    Report(&'a RenderedReport),
    Cancel { result: &'static str },
    Finished { outcome: &'a TaskOutcome },
}

enum Step {
    Update(FeedUpdate),
    Interrupt,
}

/// Execute the run command.
pub async fn execute(options: RunOptions) -> Result<()> {
    let table = StringTable::load(options.strings.as_deref())?;

    let mut job = DatabaseLoadJob::new(options.batches, options.step);
    if let Some(batch) = options.fail_after {
        job = job.failing_after(batch);
    }

    let (mut observer, handle) = JobRunner::new().spawn(job);
    info!(task_id = %handle.task_id(), batches = options.batches, "Watching database load");

    let mut interrupts = spawn_interrupt_listener();
    let printer = Printer { json: options.json };
    let mut rendered = 0usize;
    let mut interrupt_count = 0usize;

    let outcome = loop {
        let step = tokio::select! {
            update = observer.next() => Step::Update(update),
            Some(()) = interrupts.recv() => Step::Interrupt,
        };

        match step {
            Step::Update(FeedUpdate::Report(report)) => {
                rendered += 1;
                printer.report(&report.render(&table))?;
                if options.cancel_after == Some(rendered) {
                    printer.cancel(request_cancel(Some(&*report)))?;
                }
            }
            Step::Update(FeedUpdate::Finished(outcome)) => break outcome,
            Step::Interrupt => {
                interrupt_count += 1;
                printer.cancel(request_cancel(observer.current().as_deref()))?;
                if interrupt_count >= MAX_INTERRUPTS {
                    bail!("Interrupted before the database load finished");
                }
            }
        }
    };

    printer.finished(&outcome)?;
    handle.wait().await?;

    if let TaskOutcome::Failed(reason) = outcome {
        bail!("Database load failed: {reason}");
    }
    Ok(())
}

fn request_cancel(report: Option<&ProgressReport>) -> CancelOutcome {
    let result = report.map_or(CancelOutcome::NotCancelable, ProgressReport::cancel);
    debug!(result = ?result, "Cancel requested by user");
    result
}

fn spawn_interrupt_listener() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

fn cancel_label(result: CancelOutcome) -> &'static str {
    match result {
        CancelOutcome::Requested => "requested",
        CancelOutcome::AlreadyRequested => "already_requested",
        CancelOutcome::NotCancelable => "not_cancelable",
    }
}

struct Printer {
    json: bool,
}

impl Printer {
    fn emit(event: &RunEvent<'_>) -> Result<()> {
        println!("{}", serde_json::to_string(event)?);
        Ok(())
    }

    fn report(&self, report: &RenderedReport) -> Result<()> {
        if self.json {
            return Self::emit(&RunEvent::Report(report));
        }

        let mut line = format!("{} {}", "•".dimmed(), report.title.cyan().bold());
        if let Some(message) = &report.message {
            line.push_str(&format!(": {message}"));
        }
        if report.cancelable {
            line.push_str(&format!(" {}", "(Ctrl+C to cancel)".dimmed()));
        }
        println!("{line}");
        if let Some(warning) = &report.warning {
            println!("  {} {}", "⚠".yellow(), warning.yellow());
        }
        Ok(())
    }

    fn cancel(&self, result: CancelOutcome) -> Result<()> {
        if self.json {
            return Self::emit(&RunEvent::Cancel { result: cancel_label(result) });
        }

        match result {
            CancelOutcome::Requested => println!("  {} Cancellation requested", "→".dimmed()),
            CancelOutcome::AlreadyRequested => {
                println!("  {} Cancellation already requested", "→".dimmed());
            }
            CancelOutcome::NotCancelable => {
                println!("  {} This step cannot be canceled", "⚠".yellow());
            }
        }
        Ok(())
    }

    fn finished(&self, outcome: &TaskOutcome) -> Result<()> {
        if self.json {
            return Self::emit(&RunEvent::Finished { outcome });
        }

        match outcome {
            TaskOutcome::Completed => println!("\n{}", "✓ Completed".green().bold()),
            TaskOutcome::Canceled => println!("\n{}", "⚠ Canceled".yellow().bold()),
            TaskOutcome::Failed(reason) => println!("\n{} {}", "✗ Failed:".red().bold(), reason.red()),
        }
        Ok(())
    }
}
