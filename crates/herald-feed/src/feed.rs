//! Latest-wins handoff of progress reports between a producer and its observers.
//!
//! A feed holds exactly one current snapshot. Publishing replaces it wholesale,
//! so observers never see a merge of two reports, and a slow observer simply
//! skips intermediate snapshots. Finishing the publisher is the terminal
//! signal; nothing can be published afterwards because `finish` consumes it.

use herald_core::{ProgressReport, ProgressState, TaskOutcome};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

const DROPPED_REASON: &str = "publisher dropped without finishing";

#[derive(Debug, Clone)]
enum FeedSlot {
    Pending,
    Report(Arc<ProgressReport>),
    Finished(TaskOutcome),
}

/// What an observer learns when the feed moves.
#[derive(Debug, Clone)]
pub enum FeedUpdate {
    Report(Arc<ProgressReport>),
    Finished(TaskOutcome),
}

/// Creates a feed with one observer attached.
pub fn progress_feed() -> (ProgressPublisher, ProgressObserver) {
    let (tx, rx) = watch::channel(FeedSlot::Pending);
    (ProgressPublisher { tx, finished: false }, ProgressObserver { rx })
}

/// Producer side of a feed. There is exactly one per feed.
#[derive(Debug)]
pub struct ProgressPublisher {
    tx: watch::Sender<FeedSlot>,
    finished: bool,
}

impl ProgressPublisher {
    /// Replaces the current snapshot.
    ///
    /// The report is stored even when nobody is watching, so a later
    /// [`subscribe`](Self::subscribe) starts from it. Fails with
    /// [`FeedError::Closed`](crate::FeedError::Closed) in that case.
    pub fn publish(&self, report: ProgressReport) -> crate::FeedResult<()> {
        debug!(
            title = %report.title_id(),
            message = ?report.message_id(),
            warning = ?report.warning_id(),
            cancelable = report.has_cancel(),
            "Publishing progress report"
        );
        self.tx.send_replace(FeedSlot::Report(Arc::new(report)));
        if self.tx.receiver_count() == 0 {
            return Err(crate::FeedError::Closed);
        }
        Ok(())
    }

    /// Attaches another observer. It starts at the current snapshot.
    pub fn subscribe(&self) -> ProgressObserver {
        let mut rx = self.tx.subscribe();
        rx.mark_changed();
        ProgressObserver { rx }
    }

    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Ends the stream. Observers see `outcome` and no further reports.
    pub fn finish(mut self, outcome: TaskOutcome) {
        debug!(outcome = %outcome, "Finishing progress feed");
        self.tx.send_replace(FeedSlot::Finished(outcome));
        self.finished = true;
    }
}

impl Drop for ProgressPublisher {
    fn drop(&mut self) {
        if !self.finished {
            warn!("Progress publisher dropped without a terminal outcome");
            self.tx.send_replace(FeedSlot::Finished(TaskOutcome::Failed(DROPPED_REASON.to_string())));
        }
    }
}

/// Observer side of a feed. Clone it to watch from several places.
#[derive(Debug, Clone)]
pub struct ProgressObserver {
    rx: watch::Receiver<FeedSlot>,
}

impl ProgressObserver {
    /// The latest snapshot, if one has been published and the feed is still open.
    ///
    /// Never blocks.
    pub fn current(&self) -> Option<Arc<ProgressReport>> {
        match &*self.rx.borrow() {
            FeedSlot::Report(report) => Some(Arc::clone(report)),
            FeedSlot::Pending | FeedSlot::Finished(_) => None,
        }
    }

    pub fn outcome(&self) -> Option<TaskOutcome> {
        match &*self.rx.borrow() {
            FeedSlot::Finished(outcome) => Some(outcome.clone()),
            FeedSlot::Pending | FeedSlot::Report(_) => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(&*self.rx.borrow(), FeedSlot::Finished(_))
    }

    /// Protocol state of the feed, `None` before the first report.
    pub fn state(&self) -> Option<ProgressState> {
        match &*self.rx.borrow() {
            FeedSlot::Pending => None,
            FeedSlot::Report(report) => Some(ProgressState::of(report)),
            FeedSlot::Finished(outcome) => Some(ProgressState::Terminal { outcome: outcome.clone() }),
        }
    }

    /// Waits for a snapshot this observer has not seen yet, or the end of the stream.
    ///
    /// Once the feed is finished every call returns the same outcome immediately.
    pub async fn next(&mut self) -> FeedUpdate {
        loop {
            let unseen = self.rx.has_changed().unwrap_or(true);
            let slot = self.rx.borrow_and_update().clone();
            match slot {
                FeedSlot::Finished(outcome) => return FeedUpdate::Finished(outcome),
                FeedSlot::Report(report) if unseen => return FeedUpdate::Report(report),
                FeedSlot::Report(_) | FeedSlot::Pending => {}
            }

            if self.rx.changed().await.is_err() {
                let slot = self.rx.borrow_and_update().clone();
                return match slot {
                    FeedSlot::Finished(outcome) => FeedUpdate::Finished(outcome),
                    FeedSlot::Pending | FeedSlot::Report(_) => {
                        FeedUpdate::Finished(TaskOutcome::Failed(DROPPED_REASON.to_string()))
                    }
                };
            }
        }
    }
}
