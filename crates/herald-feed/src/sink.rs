use crate::feed::ProgressPublisher;
use herald_core::ProgressReport;
use tracing::{debug, info};

/// Anything a producer can hand its reports to.
pub trait ProgressSink: Send + Sync {
    fn on_report(&self, report: ProgressReport);
}

impl ProgressSink for ProgressPublisher {
    fn on_report(&self, report: ProgressReport) {
        if let Err(e) = self.publish(report) {
            debug!(error = %e, "Dropping progress report");
        }
    }
}

/// Logs every report instead of delivering it to a UI.
#[derive(Debug, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn on_report(&self, report: ProgressReport) {
        info!(
            title = %report.title_id(),
            message = ?report.message_id(),
            warning = ?report.warning_id(),
            cancelable = report.has_cancel(),
            "Progress"
        );
    }
}
