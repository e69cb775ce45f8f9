use crate::error::StorageResult as Result;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored URL record in the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The original URL that was shortened.
    pub original_url: String,
    /// Number of successful redirects recorded for the code.
    pub hits: u64,
    /// When the record was created. Informational only.
    pub created_at: Timestamp,
}

impl UrlRecord {
    /// Creates a fresh record with no hits, stamped with the current time.
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            hits: 0,
            created_at: Timestamp::now(),
        }
    }
}

/// A read-only view of a repository.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the URL record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Returns the current hit count for a short code without modifying it.
    /// Returns `None` if the code does not exist.
    async fn hits(&self, code: &ShortCode) -> Result<Option<u64>>;
}

/// A storage backend for short URL records.
///
/// Implementations own their records exclusively. Both write operations must
/// be atomic with respect to concurrent calls on the same code.
#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new URL record.
    ///
    /// Returns `Err(StorageError::Conflict)` if the code already exists; the
    /// existing record is left untouched.
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()>;

    /// Increments the hit count of a record by one and returns its original URL.
    ///
    /// The increment and the read are one atomic step. Returns `None` if the
    /// code does not exist, in which case nothing is written.
    async fn record_hit(&self, code: &ShortCode) -> Result<Option<String>>;
}

#[async_trait]
impl<T: ReadRepository> ReadRepository for std::sync::Arc<T> {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        (**self).get(code).await
    }

    async fn hits(&self, code: &ShortCode) -> Result<Option<u64>> {
        (**self).hits(code).await
    }
}

#[async_trait]
impl<T: Repository> Repository for std::sync::Arc<T> {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        (**self).insert(code, record).await
    }

    async fn record_hit(&self, code: &ShortCode) -> Result<Option<String>> {
        (**self).record_hit(code).await
    }
}
