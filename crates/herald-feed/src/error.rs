use thiserror::Error;

pub type FeedResult<T> = std::result::Result<T, FeedError>;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Every observer of the feed has been dropped.
    #[error("progress feed closed: no observers left")]
    Closed,

    #[error("job cancelled")]
    Cancelled,

    #[error("job error: {0}")]
    Job(String),

    #[error("job task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
