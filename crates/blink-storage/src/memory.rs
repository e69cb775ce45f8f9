use async_trait::async_trait;
use blink_core::error::StorageResult as Result;
use blink_core::{ReadRepository, Repository, ShortCode, StorageError, UrlRecord};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap shards the map behind per-shard locks. Every mutation runs while
/// holding the write lock of the shard that owns the code, so the
/// check-then-insert in [`Repository::insert`] and the increment-then-read in
/// [`Repository::record_hit`] cannot interleave with another call on the same
/// code. No lock is held across an `.await`.
///
/// Records live only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: DashMap<String, UrlRecord>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| entry.value().clone()))
    }

    async fn hits(&self, code: &ShortCode) -> Result<Option<u64>> {
        Ok(self.storage.get(code.as_str()).map(|entry| entry.hits))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        match self.storage.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn record_hit(&self, code: &ShortCode) -> Result<Option<String>> {
        let Some(mut entry) = self.storage.get_mut(code.as_str()) else {
            return Ok(None);
        };

        entry.hits = entry.hits.saturating_add(1);
        Ok(Some(entry.original_url.clone()))
    }
}
