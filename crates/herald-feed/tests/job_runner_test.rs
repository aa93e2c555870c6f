//! JobRunner integration tests: reporting, cancellation, and terminal outcomes.

use async_trait::async_trait;
use herald_core::{CancelOutcome, ProgressReport, ResourceId, TaskOutcome};
use herald_feed::{FeedError, FeedResult, FeedUpdate, JobContext, JobRunner, ProgressJob};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const WORKING: ResourceId = ResourceId(1);
const DONE: ResourceId = ResourceId(2);

/// Reports once, then waits until it is cancelled.
struct WaitForCancel;

#[async_trait]
impl ProgressJob for WaitForCancel {
    fn name(&self) -> &'static str {
        "wait-for-cancel"
    }

    async fn run(&self, ctx: &JobContext) -> FeedResult<()> {
        ctx.report(ctx.cancelable(ProgressReport::new(WORKING)));
        ctx.cancelled().await;
        ctx.checkpoint()
    }
}

/// Publishes a fixed number of steps and completes.
struct Steps(u32);

#[async_trait]
impl ProgressJob for Steps {
    fn name(&self) -> &'static str {
        "steps"
    }

    async fn run(&self, ctx: &JobContext) -> FeedResult<()> {
        for _ in 0..self.0 {
            ctx.checkpoint()?;
            ctx.report(ProgressReport::new(WORKING));
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        ctx.report(ProgressReport::new(DONE));
        Ok(())
    }
}

struct Failing;

#[async_trait]
impl ProgressJob for Failing {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn run(&self, ctx: &JobContext) -> FeedResult<()> {
        ctx.report(ProgressReport::new(WORKING));
        Err(FeedError::Job("vault locked".to_string()))
    }
}

/// Never looks at its cancellation state.
struct Oblivious;

#[async_trait]
impl ProgressJob for Oblivious {
    fn name(&self) -> &'static str {
        "oblivious"
    }

    async fn run(&self, ctx: &JobContext) -> FeedResult<()> {
        ctx.report(ctx.cancelable(ProgressReport::new(WORKING)));
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

#[tokio::test]
async fn test_completed_job_finishes_feed() {
    let (mut observer, handle) = JobRunner::new().spawn(Steps(3));

    let outcome = loop {
        match observer.next().await {
            FeedUpdate::Report(report) => assert!(!report.has_cancel()),
            FeedUpdate::Finished(outcome) => break outcome,
        }
    };

    assert_eq!(outcome, TaskOutcome::Completed);
    assert_eq!(handle.wait().await.unwrap(), TaskOutcome::Completed);
}

#[tokio::test]
async fn test_cancel_through_observed_report() {
    let (mut observer, handle) = JobRunner::new().spawn(WaitForCancel);

    let FeedUpdate::Report(report) = observer.next().await else {
        panic!("expected a report first");
    };
    assert!(report.has_cancel());
    assert_eq!(report.cancel(), CancelOutcome::Requested);
    assert_eq!(report.cancel(), CancelOutcome::AlreadyRequested);

    assert!(matches!(observer.next().await, FeedUpdate::Finished(TaskOutcome::Canceled)));
    assert_eq!(handle.wait().await.unwrap(), TaskOutcome::Canceled);
}

#[tokio::test]
async fn test_cancel_through_handle() {
    let (mut observer, handle) = JobRunner::new().spawn(WaitForCancel);
    assert!(matches!(observer.next().await, FeedUpdate::Report(_)));

    handle.cancel();

    assert!(matches!(observer.next().await, FeedUpdate::Finished(TaskOutcome::Canceled)));
}

#[tokio::test]
async fn test_job_that_ignores_cancellation_is_stopped() {
    let (mut observer, handle) = JobRunner::new().spawn(Oblivious);

    let FeedUpdate::Report(report) = observer.next().await else {
        panic!("expected a report first");
    };
    report.cancel();

    let outcome = tokio::time::timeout(Duration::from_secs(5), handle.wait()).await.unwrap().unwrap();
    assert_eq!(outcome, TaskOutcome::Canceled);
}

#[tokio::test]
async fn test_failed_job_reports_reason() {
    let (mut observer, handle) = JobRunner::new().spawn(Failing);

    let outcome = loop {
        if let FeedUpdate::Finished(outcome) = observer.next().await {
            break outcome;
        }
    };

    assert_eq!(outcome, TaskOutcome::Failed("job error: vault locked".to_string()));
    assert!(matches!(handle.wait().await.unwrap(), TaskOutcome::Failed(_)));
}

#[tokio::test]
async fn test_parent_token_cancels_spawned_jobs() {
    let parent = CancellationToken::new();
    let runner = JobRunner::with_parent(parent.clone());
    let (_first_observer, first) = runner.spawn(WaitForCancel);
    let (_second_observer, second) = runner.spawn(WaitForCancel);
    assert_ne!(first.task_id(), second.task_id());

    parent.cancel();

    assert_eq!(first.wait().await.unwrap(), TaskOutcome::Canceled);
    assert_eq!(second.wait().await.unwrap(), TaskOutcome::Canceled);
}

#[tokio::test]
async fn test_job_survives_dropped_observer() {
    let (observer, handle) = JobRunner::new().spawn(Steps(2));
    drop(observer);

    assert_eq!(handle.wait().await.unwrap(), TaskOutcome::Completed);
}
