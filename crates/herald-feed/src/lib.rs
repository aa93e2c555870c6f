//! Herald Feed
//!
//! Moves progress reports from a background task to whoever is watching it:
//! - A latest-wins publish/observe channel (`progress_feed`)
//! - A sink seam for producers that only emit reports (`ProgressSink`)
//! - A runner that executes a job, wires its cancellation token into the
//!   reports it publishes, and signals the terminal outcome (`JobRunner`)

pub mod error;
pub mod feed;
pub mod job;
pub mod sink;

pub use error::{FeedError, FeedResult};
pub use feed::{FeedUpdate, ProgressObserver, ProgressPublisher, progress_feed};
pub use job::{JobContext, JobHandle, JobRunner, ProgressJob, TaskId};
pub use sink::{ProgressSink, TracingSink};
