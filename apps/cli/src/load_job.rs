//! Simulated database load used to drive the progress feed.

use crate::strings::ids;
use async_trait::async_trait;
use herald_core::ProgressReport;
use herald_feed::{FeedError, FeedResult, JobContext, ProgressJob};
use std::time::Duration;
use tracing::debug;

const BATCH_MESSAGES: [herald_core::ResourceId; 3] =
    [ids::READING_GROUPS, ids::READING_ENTRIES, ids::BUILDING_INDEX];

#[derive(Debug, Clone)]
pub struct DatabaseLoadJob {
    batches: u32,
    step: Duration,
    fail_after: Option<u32>,
}

impl DatabaseLoadJob {
    #[must_use]
    pub fn new(batches: u32, step: Duration) -> Self {
        Self { batches, step, fail_after: None }
    }

    /// Fail once `batches` entry batches have been loaded.
    #[must_use]
    pub fn failing_after(mut self, batches: u32) -> Self {
        self.fail_after = Some(batches);
        self
    }
}

#[async_trait]
impl ProgressJob for DatabaseLoadJob {
    fn name(&self) -> &'static str {
        "database-load"
    }

    async fn run(&self, ctx: &JobContext) -> FeedResult<()> {
        ctx.report(ProgressReport::new(ids::OPENING_DATABASE).with_message(ids::READING_HEADER));
        tokio::time::sleep(self.step).await;

        ctx.checkpoint()?;
        ctx.report(ctx.cancelable(
            ProgressReport::new(ids::DECRYPTING_DATABASE)
                .with_message(ids::DERIVING_KEY)
                .with_warning(ids::DO_NOT_KILL_APP),
        ));
        tokio::time::sleep(self.step).await;

        for (batch, message) in (0..self.batches).zip(BATCH_MESSAGES.iter().cycle()) {
            ctx.checkpoint()?;
            if self.fail_after == Some(batch) {
                return Err(FeedError::Job(format!("corrupted entry block in batch {batch}")));
            }
            debug!(task_id = %ctx.task_id(), batch, "Loading entry batch");
            ctx.report(ctx.cancelable(ProgressReport::new(ids::LOADING_ENTRIES).with_message(*message)));
            tokio::time::sleep(self.step).await;
        }

        ctx.checkpoint()?;
        ctx.report(ProgressReport::new(ids::FINALIZING));
        tokio::time::sleep(self.step).await;
        Ok(())
    }
}
