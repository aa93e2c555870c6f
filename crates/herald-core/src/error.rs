use thiserror::Error;

pub type ReportResult<T> = std::result::Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid resource id: {0}")]
    InvalidResourceId(String),
}
