//! Herald Core
//!
//! The progress notification contract shared by background tasks and the
//! presentation layers that watch them:
//! - Describing a task's current state (`ProgressReport`)
//! - Referring to display text without resolving it (`ResourceId`, `TextResolver`)
//! - Asking the owning task to stop (`CancelHandle`)
//! - Classifying where a task is in its reporting lifecycle (`ProgressState`)

pub mod cancel;
pub mod error;
pub mod render;
pub mod report;
pub mod resource;
pub mod state;

pub use cancel::{CancelHandle, CancelOutcome};
pub use error::{ReportError, ReportResult};
pub use render::RenderedReport;
pub use report::ProgressReport;
pub use resource::{ResourceId, TextResolver};
pub use state::{ProgressState, TaskOutcome};
