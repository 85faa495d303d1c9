use crate::{
    domain::record::RecordKey,
    error::{GridError, Result},
    storage::{storage_key, RecordStore, StoredRecord},
};
use async_trait::async_trait;
use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::debug;

/// File-based record store: one JSON document per record
pub struct FileRecordStore<T> {
    root_path: PathBuf,
    collection: String,
    _records: PhantomData<fn() -> T>,
}

impl<T> FileRecordStore<T> {
    const DATA_DIR: &'static str = ".gridview";

    /// Creates a store for `collection` (e.g. "deals") under the project root
    pub fn new(project_root: impl AsRef<Path>, collection: impl Into<String>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::DATA_DIR),
            collection: collection.into(),
            _records: PhantomData,
        }
    }

    fn collection_dir(&self) -> PathBuf {
        self.root_path.join(&self.collection)
    }

    fn record_file(&self, id: &RecordKey) -> Result<PathBuf> {
        let key = id.as_str();
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(GridError::InvalidRecordId(key.to_string()));
        }
        Ok(self.collection_dir().join(format!("{}.json", key)))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<T: StoredRecord> RecordStore<T> for FileRecordStore<T> {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.collection_dir()).await?;

        let gitignore_path = self.root_path.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(gitignore_path, "# Local record snapshots\n*.tmp\n").await?;
        }

        Ok(())
    }

    async fn list(&self) -> Result<Vec<T>> {
        let dir = self.collection_dir();

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&dir).await?;
        let mut paths: Vec<PathBuf> = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let contents = fs::read_to_string(&path).await?;
            records.push(serde_json::from_str(&contents)?);
        }

        debug!(collection = %self.collection, count = records.len(), "listed records");
        Ok(records)
    }

    async fn load(&self, id: &RecordKey) -> Result<T> {
        let file_path = self.record_file(id)?;

        if !file_path.exists() {
            return Err(GridError::RecordNotFound(id.to_string()));
        }

        let contents = fs::read_to_string(&file_path).await?;
        let record: T = serde_json::from_str(&contents)?;

        Ok(record)
    }

    async fn save(&self, record: &T) -> Result<()> {
        self.ensure_directory_exists(&self.collection_dir()).await?;

        let file_path = self.record_file(&storage_key(record)?)?;
        let json = serde_json::to_string_pretty(record)?;

        fs::write(file_path, json).await?;
        Ok(())
    }

    async fn delete(&self, id: &RecordKey) -> Result<()> {
        let file_path = self.record_file(id)?;

        if !file_path.exists() {
            return Err(GridError::RecordNotFound(id.to_string()));
        }

        fs::remove_file(file_path).await?;
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        self.collection_dir().exists()
    }
}
