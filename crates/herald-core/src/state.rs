use crate::report::ProgressReport;
use serde::{Deserialize, Serialize};

/// How a task's reporting stream ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum TaskOutcome {
    Completed,
    Failed(String),
    Canceled,
}

impl std::fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            Self::Canceled => f.write_str("canceled"),
        }
    }
}

/// Where a task is in its reporting lifecycle.
///
/// Running and RunningWithWarning alternate freely while reports are being
/// published. Terminal is entered once, out-of-band, and nothing is published
/// after it. Cancelability is orthogonal; ask the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProgressState {
    Running,
    RunningWithWarning,
    Terminal { outcome: TaskOutcome },
}

impl ProgressState {
    /// State implied by a published report.
    pub fn of(report: &ProgressReport) -> Self {
        if report.has_warning() { Self::RunningWithWarning } else { Self::Running }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal { .. })
    }
}
