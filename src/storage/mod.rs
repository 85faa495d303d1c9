use crate::{
    domain::record::{Identified, RecordKey, Regroupable},
    error::{GridError, Result},
};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

#[cfg(feature = "file-storage")]
pub mod file_storage;
pub mod memory_storage;

#[cfg(feature = "file-storage")]
pub use file_storage::FileRecordStore;
pub use memory_storage::MemoryRecordStore;

/// Records that can be persisted by a [`RecordStore`]
pub trait StoredRecord:
    Regroupable + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
}

impl<T> StoredRecord for T where
    T: Regroupable + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
}

/// Key under which a record is persisted; records without an id cannot be stored
pub fn storage_key<T: Identified>(record: &T) -> Result<RecordKey> {
    match record.id() {
        Some(key) if !key.as_str().is_empty() => Ok(key),
        _ => Err(GridError::InvalidRecordId(String::new())),
    }
}

/// Storage trait for persisting the records of one feature
#[async_trait]
pub trait RecordStore<T: StoredRecord>: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Loads every record
    async fn list(&self) -> Result<Vec<T>>;

    /// Loads a record by key
    async fn load(&self, id: &RecordKey) -> Result<T>;

    /// Inserts or replaces a record
    async fn save(&self, record: &T) -> Result<()>;

    /// Deletes a record
    async fn delete(&self, id: &RecordKey) -> Result<()>;

    /// Rewrites the grouping field of a record and returns the stored result
    async fn update_group(&self, id: &RecordKey, group_key: &str) -> Result<T> {
        let mut record = self.load(id).await?;
        record.set_group_key(group_key);
        self.save(&record).await?;
        Ok(record)
    }

    /// Checks if the store is initialized
    async fn is_initialized(&self) -> bool;
}
