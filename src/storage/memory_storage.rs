use crate::{
    domain::record::RecordKey,
    error::{GridError, Result},
    storage::{storage_key, RecordStore, StoredRecord},
};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

/// In-process record store, kept in insertion order
pub struct MemoryRecordStore<T> {
    records: Mutex<Vec<T>>,
}

impl<T> MemoryRecordStore<T> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<T>>> {
        self.records
            .lock()
            .map_err(|_| GridError::StorageError("record store lock poisoned".to_string()))
    }
}

impl<T> Default for MemoryRecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: StoredRecord> RecordStore<T> for MemoryRecordStore<T> {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<T>> {
        Ok(self.lock()?.clone())
    }

    async fn load(&self, id: &RecordKey) -> Result<T> {
        self.lock()?
            .iter()
            .find(|record| record.id().as_ref() == Some(id))
            .cloned()
            .ok_or_else(|| GridError::RecordNotFound(id.to_string()))
    }

    async fn save(&self, record: &T) -> Result<()> {
        let key = storage_key(record)?;
        let mut records = self.lock()?;
        match records
            .iter_mut()
            .find(|existing| existing.id().as_ref() == Some(&key))
        {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }

    async fn delete(&self, id: &RecordKey) -> Result<()> {
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|record| record.id().as_ref() != Some(id));
        if records.len() == before {
            return Err(GridError::RecordNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Identified;
    use crate::domain::todo::{Todo, TodoStatus};

    #[tokio::test]
    async fn test_save_replaces_existing_record() {
        let store: MemoryRecordStore<Todo> = MemoryRecordStore::new();
        let mut todo = Todo::new("Draft");
        store.save(&todo).await.unwrap();

        todo.title = "Final".to_string();
        store.save(&todo).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Final");
    }

    #[tokio::test]
    async fn test_update_group_and_delete() {
        let todo = Todo::new("Follow up");
        let key = todo.id().unwrap();
        let store = MemoryRecordStore::with_records(vec![todo]);

        let updated = store.update_group(&key, "done").await.unwrap();
        assert_eq!(updated.status, TodoStatus::Done);

        store.delete(&key).await.unwrap();
        assert!(matches!(
            store.load(&key).await,
            Err(GridError::RecordNotFound(_))
        ));
    }
}
