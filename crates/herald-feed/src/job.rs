//! Running long jobs that report progress and can be cancelled.

use crate::error::{FeedError, FeedResult};
use crate::feed::{ProgressObserver, ProgressPublisher, progress_feed};
use crate::sink::ProgressSink;
use async_trait::async_trait;
use herald_core::{CancelHandle, ProgressReport, TaskOutcome};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Identifier for a running job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(pub String);

impl TaskId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The long-running work behind a progress feed.
#[async_trait]
pub trait ProgressJob: Send + Sync {
    fn name(&self) -> &'static str;

    /// Does the work, publishing reports through `ctx`.
    ///
    /// Return `Err(FeedError::Cancelled)` (usually via [`JobContext::checkpoint`])
    /// to stop early. A job that never checks is still stopped at its next
    /// await point once cancellation is requested.
    async fn run(&self, ctx: &JobContext) -> FeedResult<()>;
}

/// What a running job sees of its feed and its cancellation state.
#[derive(Debug)]
pub struct JobContext {
    task_id: TaskId,
    publisher: ProgressPublisher,
    token: CancellationToken,
    cancel: CancelHandle,
}

impl JobContext {
    fn new(task_id: TaskId, publisher: ProgressPublisher, token: CancellationToken) -> Self {
        let signal = token.clone();
        let cancel = CancelHandle::new(move || signal.cancel());
        Self { task_id, publisher, token, cancel }
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Publishes a snapshot. Nobody watching is not an error here.
    pub fn report(&self, report: ProgressReport) {
        self.publisher.on_report(report);
    }

    /// Attaches this job's cancellation handle to `report`.
    #[must_use]
    pub fn cancelable(&self, report: ProgressReport) -> ProgressReport {
        report.with_cancel(self.cancel.clone())
    }

    /// Handle that cancels this job. Every clone signals the same token.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn sink(&self) -> &dyn ProgressSink {
        &self.publisher
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// `Err(FeedError::Cancelled)` once cancellation has been requested.
    pub fn checkpoint(&self) -> FeedResult<()> {
        if self.token.is_cancelled() { Err(FeedError::Cancelled) } else { Ok(()) }
    }
}

/// Spawns jobs onto the tokio runtime, each with its own feed.
#[derive(Debug, Clone, Default)]
pub struct JobRunner {
    parent: Option<CancellationToken>,
}

impl JobRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancelling `parent` cancels every job this runner spawns.
    #[must_use]
    pub fn with_parent(parent: CancellationToken) -> Self {
        Self { parent: Some(parent) }
    }

    /// Starts `job` and returns an observer for its feed plus a handle to it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<J>(&self, job: J) -> (ProgressObserver, JobHandle)
    where
        J: ProgressJob + 'static,
    {
        let token = self.parent.as_ref().map_or_else(CancellationToken::new, CancellationToken::child_token);
        let task_id = TaskId::new();
        let (publisher, observer) = progress_feed();
        let ctx = JobContext::new(task_id.clone(), publisher, token.clone());

        debug!(task_id = %task_id, job = job.name(), "Spawning job");
        let join = tokio::spawn(drive(job, ctx));

        (observer, JobHandle { task_id, token, join })
    }
}

async fn drive<J: ProgressJob>(job: J, ctx: JobContext) -> TaskOutcome {
    info!(task_id = %ctx.task_id, job = job.name(), "Job started");

    let result = tokio::select! {
        biased;
        result = job.run(&ctx) => result,
        () = ctx.token.cancelled() => Err(FeedError::Cancelled),
    };
    let outcome = outcome_for(result, &ctx.token);

    match &outcome {
        TaskOutcome::Completed => info!(task_id = %ctx.task_id, "Job completed"),
        TaskOutcome::Canceled => info!(task_id = %ctx.task_id, "Job cancelled"),
        TaskOutcome::Failed(reason) => warn!(task_id = %ctx.task_id, reason = %reason, "Job failed"),
    }

    ctx.publisher.finish(outcome.clone());
    outcome
}

fn outcome_for(result: FeedResult<()>, token: &CancellationToken) -> TaskOutcome {
    match result {
        Ok(()) => TaskOutcome::Completed,
        Err(FeedError::Cancelled) => TaskOutcome::Canceled,
        Err(e) if token.is_cancelled() => {
            debug!(error = %e, "Job error after cancellation treated as cancelled");
            TaskOutcome::Canceled
        }
        Err(e) => TaskOutcome::Failed(e.to_string()),
    }
}

/// Owner's handle on a spawned job.
#[derive(Debug)]
pub struct JobHandle {
    task_id: TaskId,
    token: CancellationToken,
    join: JoinHandle<TaskOutcome>,
}

impl JobHandle {
    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn cancel(&self) {
        info!(task_id = %self.task_id, "Cancelling job");
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the job and returns how it ended.
    pub async fn wait(self) -> FeedResult<TaskOutcome> {
        Ok(self.join.await?)
    }
}
