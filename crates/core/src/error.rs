use crate::model::{BookingId, DocumentId};
use docvault_files::FilesError;

/// Failure reported by a persistence backend.
///
/// "Not found" is never an error here; store lookups return `Ok(None)` for that.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("uniqueness constraint violated: {0}")]
    Conflict(String),
}

impl StoreError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let reason: String = reason.into();
        StoreError::Unavailable(reason.into())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Conflict(err.to_string())
            }
            _ => StoreError::Unavailable(Box::new(err)),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The only failures upload resolution can produce.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload exceeds the limit of {limit} bytes")]
    SizeLimitExceeded { limit: u64 },
    #[error("failed to read upload stream: {0}")]
    StreamReadFailed(#[source] std::io::Error),
    #[error("document store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),
}

impl From<StoreError> for UploadError {
    fn from(err: StoreError) -> Self {
        UploadError::StoreUnavailable(err)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document {0} not found")]
    NotFound(DocumentId),
    #[error("invalid filename: {0}")]
    InvalidFilename(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("conflicting document: {0}")]
    Conflict(String),
    #[error("document store unavailable: {0}")]
    Store(#[source] StoreError),
    #[error("failed to write document file: {0}")]
    FileWrite(#[source] FilesError),
    #[error("failed to read document file: {0}")]
    FileRead(#[source] FilesError),
}

impl From<StoreError> for DocumentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(reason) => DocumentError::Conflict(reason),
            other => DocumentError::Store(other),
        }
    }
}

pub type DocumentResult<T> = std::result::Result<T, DocumentError>;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("booking {0} not found")]
    NotFound(BookingId),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("booking store unavailable: {0}")]
    Store(#[from] StoreError),
}

pub type BookingResult<T> = std::result::Result<T, BookingError>;
