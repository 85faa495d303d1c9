use crate::{
    domain::{
        board::compute_columns,
        record::{record_key, RecordKey, Searchable},
    },
    drag::MoveIntent,
    error::{GridError, Result},
    storage::{storage_key, RecordStore, StoredRecord},
};
use tracing::{debug, info, warn};

/// Client-side state of one feature (deals, todos, ...).
///
/// Each operation performs a single storage call, waits for it and then
/// updates the in-memory list. Moves are applied optimistically and rolled
/// back if storage refuses them.
pub struct FeatureStore<T: StoredRecord, S: RecordStore<T>> {
    storage: S,
    records: Vec<T>,
}

/// Count and amount total of one group, as shown on a dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub key: String,
    pub count: usize,
    pub total: f64,
}

/// Restores a record to its snapshot unless the move is committed.
/// Also covers the caller dropping the move future before it settles.
struct Rollback<'a, T> {
    slot: &'a mut T,
    snapshot: Option<T>,
}

impl<'a, T> Rollback<'a, T> {
    fn commit(mut self, stored: T) {
        self.snapshot = None;
        *self.slot = stored;
    }
}

impl<T> Drop for Rollback<'_, T> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.slot = snapshot;
        }
    }
}

impl<T: StoredRecord, S: RecordStore<T>> FeatureStore<T, S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            records: Vec::new(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Replaces the in-memory list with what storage holds
    pub async fn fetch(&mut self) -> Result<&[T]> {
        if !self.storage.is_initialized().await {
            return Err(GridError::StoreNotInitialized);
        }
        self.records = self.storage.list().await?;
        debug!(count = self.records.len(), "fetched records");
        Ok(&self.records)
    }

    /// Records matching `query`, case-insensitively. A blank query matches
    /// everything.
    pub fn filtered(&self, query: &str) -> Vec<&T>
    where
        T: Searchable,
    {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|record| record.matches(&needle))
            .collect()
    }

    pub async fn create(&mut self, record: T) -> Result<&T> {
        self.storage.save(&record).await?;
        self.records.push(record);
        let index = self.records.len() - 1;
        Ok(&self.records[index])
    }

    pub async fn update(&mut self, record: T) -> Result<()> {
        let key = storage_key(&record)?;
        self.storage.save(&record).await?;
        match self.position(key.as_str()) {
            Some(index) => self.records[index] = record,
            None => self.records.push(record),
        }
        Ok(())
    }

    pub async fn remove(&mut self, id: &RecordKey) -> Result<T> {
        self.storage.delete(id).await?;
        match self.position(id.as_str()) {
            Some(index) => Ok(self.records.remove(index)),
            None => Err(GridError::RecordNotFound(id.to_string())),
        }
    }

    /// Applies a board move.
    ///
    /// The record's group key changes locally before storage is asked;
    /// if storage fails the record is restored to its prior state and the
    /// error is returned.
    pub async fn move_record(&mut self, intent: &MoveIntent) -> Result<()> {
        let index = self
            .position(&intent.item_id)
            .ok_or_else(|| GridError::RecordNotFound(intent.item_id.clone()))?;
        let key = record_key(&self.records[index], index);

        let Self { storage, records } = self;
        let slot = &mut records[index];
        let snapshot = slot.clone();
        slot.set_group_key(&intent.to_key);
        let pending = Rollback {
            slot,
            snapshot: Some(snapshot),
        };
        debug!(item_id = %intent.item_id, to = %intent.to_key, "applied optimistic move");

        match storage.update_group(&key, &intent.to_key).await {
            Ok(stored) => {
                pending.commit(stored);
                info!(item_id = %intent.item_id, from = %intent.from_key, to = %intent.to_key, "record moved");
                Ok(())
            }
            Err(e) => {
                drop(pending);
                warn!(item_id = %intent.item_id, error = %e, "move failed, rolled back");
                Err(e)
            }
        }
    }

    /// Per-group record counts and amount totals, keys in `order` first
    pub fn summary(&self, order: Option<&[String]>) -> Vec<GroupSummary> {
        let summary: Vec<GroupSummary> = compute_columns(
            &self.records,
            |record: &T| record.group_key(),
            order,
            Some(|record: &T| record.amount()),
        )
        .into_iter()
        .map(|column| GroupSummary {
            count: column.len(),
            total: column.total.unwrap_or_default(),
            key: column.key,
        })
        .collect();
        debug!(groups = summary.len(), "summarized records");
        summary
    }

    /// Serializes the in-memory records as a JSON array
    pub fn export_json(&self) -> Result<Vec<u8>> {
        let bytes = serde_json::to_vec_pretty(&self.records)?;
        info!(count = self.records.len(), "exported records");
        Ok(bytes)
    }

    /// Imports a JSON array of records, saving each one. Records whose id
    /// is already present replace the existing entry.
    pub async fn import_json(&mut self, bytes: &[u8]) -> Result<usize> {
        let imported: Vec<T> = serde_json::from_slice(bytes)?;
        let count = imported.len();
        for record in imported {
            self.update(record).await?;
        }
        info!(count, "imported records");
        Ok(count)
    }

    fn position(&self, item_id: &str) -> Option<usize> {
        self.records
            .iter()
            .enumerate()
            .position(|(index, record)| record_key(record, index).as_str() == item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deal::{Deal, DealStage};
    use crate::domain::record::Identified;
    use crate::storage::MemoryRecordStore;
    use async_trait::async_trait;
    use futures::FutureExt;

    /// Memory store whose group updates always fail
    struct RejectingStore(MemoryRecordStore<Deal>);

    #[async_trait]
    impl RecordStore<Deal> for RejectingStore {
        async fn initialize(&self) -> Result<()> {
            self.0.initialize().await
        }

        async fn list(&self) -> Result<Vec<Deal>> {
            self.0.list().await
        }

        async fn load(&self, id: &RecordKey) -> Result<Deal> {
            self.0.load(id).await
        }

        async fn save(&self, record: &Deal) -> Result<()> {
            self.0.save(record).await
        }

        async fn delete(&self, id: &RecordKey) -> Result<()> {
            self.0.delete(id).await
        }

        async fn update_group(&self, _id: &RecordKey, _group_key: &str) -> Result<Deal> {
            tokio::task::yield_now().await;
            Err(GridError::StorageError("stage update refused".to_string()))
        }

        async fn is_initialized(&self) -> bool {
            true
        }
    }

    fn intent(deal: &Deal, to: &str) -> MoveIntent {
        MoveIntent {
            item_id: deal.id.to_string(),
            from_key: deal.stage.key().to_string(),
            to_key: to.to_string(),
        }
    }

    async fn seeded() -> (FeatureStore<Deal, MemoryRecordStore<Deal>>, Vec<Deal>) {
        let deals = vec![
            Deal::new("Website", 4_000.0).with_company("Acme"),
            Deal::new("Support plan", 1_200.0).with_company("Globex"),
        ];
        let mut store = FeatureStore::new(MemoryRecordStore::with_records(deals.clone()));
        store.fetch().await.unwrap();
        (store, deals)
    }

    #[tokio::test]
    async fn test_fetch_and_filter() {
        let (store, _) = seeded().await;

        assert_eq!(store.records().len(), 2);
        assert_eq!(store.filtered("").len(), 2);
        assert_eq!(store.filtered("  ACME ").len(), 1);
        assert!(store.filtered("initech").is_empty());
    }

    #[tokio::test]
    async fn test_create_update_remove() {
        let (mut store, deals) = seeded().await;

        let created = store.create(Deal::new("Upsell", 300.0)).await.unwrap();
        assert_eq!(created.name, "Upsell");
        assert_eq!(store.storage().list().await.unwrap().len(), 3);

        let mut renamed = deals[0].clone();
        renamed.name = "Website v2".to_string();
        store.update(renamed).await.unwrap();
        assert_eq!(store.records()[0].name, "Website v2");

        let removed = store.remove(&deals[1].id().unwrap()).await.unwrap();
        assert_eq!(removed.name, "Support plan");
        assert_eq!(store.records().len(), 2);
    }

    #[tokio::test]
    async fn test_move_record_commits() {
        let (mut store, deals) = seeded().await;

        store.move_record(&intent(&deals[0], "won")).await.unwrap();

        assert_eq!(store.records()[0].stage, DealStage::Won);
        let stored = store.storage().load(&deals[0].id().unwrap()).await.unwrap();
        assert_eq!(stored.stage, DealStage::Won);
    }

    #[tokio::test]
    async fn test_move_record_rolls_back_on_failure() {
        let deal = Deal::new("Website", 4_000.0);
        let mut store = FeatureStore::new(RejectingStore(MemoryRecordStore::with_records(vec![
            deal.clone(),
        ])));
        store.fetch().await.unwrap();

        let result = store.move_record(&intent(&deal, "won")).await;

        assert!(matches!(result, Err(GridError::StorageError(_))));
        assert_eq!(store.records()[0], deal);
    }

    #[tokio::test]
    async fn test_abandoned_move_rolls_back() {
        let deal = Deal::new("Website", 4_000.0);
        let mut store = FeatureStore::new(RejectingStore(MemoryRecordStore::with_records(vec![
            deal.clone(),
        ])));
        store.fetch().await.unwrap();

        let moving = intent(&deal, "won");
        {
            let pending = store.move_record(&moving);
            tokio::pin!(pending);
            // poll once so the optimistic change is applied, then abandon it
            assert!(pending.as_mut().now_or_never().is_none());
        }

        assert_eq!(store.records()[0].stage, DealStage::EarlyStage);
    }

    #[tokio::test]
    async fn test_move_unknown_record() {
        let (mut store, _) = seeded().await;
        let ghost = Deal::new("Ghost", 0.0);

        let result = store.move_record(&intent(&ghost, "won")).await;
        assert!(matches!(result, Err(GridError::RecordNotFound(_))));
    }

    #[tokio::test]
    async fn test_export_then_import_into_empty_store() {
        let (store, deals) = seeded().await;
        let bytes = store.export_json().unwrap();

        let mut fresh: FeatureStore<Deal, MemoryRecordStore<Deal>> =
            FeatureStore::new(MemoryRecordStore::new());
        let count = fresh.import_json(&bytes).await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(fresh.records(), deals.as_slice());
        assert_eq!(fresh.storage().list().await.unwrap().len(), 2);

        // re-importing replaces rather than duplicates
        fresh.import_json(&bytes).await.unwrap();
        assert_eq!(fresh.records().len(), 2);
    }

    #[tokio::test]
    async fn test_import_rejects_malformed_json() {
        let mut store: FeatureStore<Deal, MemoryRecordStore<Deal>> =
            FeatureStore::new(MemoryRecordStore::new());
        let result = store.import_json(b"[{\"name\": 1}]").await;
        assert!(matches!(result, Err(GridError::SerializationError(_))));
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn test_summary_counts_and_totals_per_stage() {
        let deals = vec![
            Deal::new("Website", 4_000.0).with_stage(DealStage::Won),
            Deal::new("Support plan", 1_200.0).with_stage(DealStage::Won),
            Deal::new("Audit", 900.0),
        ];
        let mut store = FeatureStore::new(MemoryRecordStore::with_records(deals));
        store.fetch().await.unwrap();

        let order = vec!["early-stage".to_string(), "lost".to_string()];
        let summary = store.summary(Some(order.as_slice()));

        assert_eq!(
            summary,
            vec![
                GroupSummary {
                    key: "early-stage".to_string(),
                    count: 1,
                    total: 900.0
                },
                GroupSummary {
                    key: "lost".to_string(),
                    count: 0,
                    total: 0.0
                },
                GroupSummary {
                    key: "won".to_string(),
                    count: 2,
                    total: 5_200.0
                },
            ]
        );
    }

    #[cfg(feature = "file-storage")]
    #[tokio::test]
    async fn test_fetch_requires_initialized_storage() {
        use crate::storage::FileRecordStore;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let mut store: FeatureStore<Deal, FileRecordStore<Deal>> =
            FeatureStore::new(FileRecordStore::new(temp_dir.path(), "deals"));

        let result = store.fetch().await;
        assert!(matches!(result, Err(GridError::StoreNotInitialized)));

        store.storage().initialize().await.unwrap();
        assert!(store.fetch().await.unwrap().is_empty());
    }
}
