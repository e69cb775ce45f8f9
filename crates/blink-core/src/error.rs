use thiserror::Error;

/// Result type for repository operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Result type for [`UrlStore`][crate::UrlStore] operations.
pub type Result<T> = std::result::Result<T, ShortenerError>;

/// Errors raised by a storage backend.
///
/// `Conflict` is the only variant that carries domain meaning: the requested
/// short code is already taken. Everything else is an infrastructure fault.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Returns `true` if the error reports a short code collision.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::Conflict(_))
    }
}

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("no free short code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("infrastructure error: {0}")]
    Infrastructure(#[from] StorageError),
}
