use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{Filter, Record, RecordStore, StoreError, StoreResult};

/// Insertion-ordered store kept in process memory.
///
/// Every call holds the lock for its whole duration, so a single call is
/// atomic. Separate calls are not isolated from each other: a read followed
/// by a save races with other writers and the last save wins.
pub struct MemoryStore<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Build a store pre-populated with `records`, rejecting duplicate ids.
    pub fn with_records(records: Vec<T>) -> StoreResult<Self> {
        let mut seen = std::collections::HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id()) {
                return Err(StoreError::DuplicateId(record.id()));
            }
        }

        Ok(Self {
            records: RwLock::new(records),
        })
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for MemoryStore<T> {
    async fn get_all(&self) -> StoreResult<Vec<T>> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<T>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.id() == id).cloned())
    }

    async fn scan(&self, filter: &Filter<T>) -> StoreResult<Vec<T>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    async fn save(&self, record: T) -> StoreResult<T> {
        let mut records = self.records.write().await;
        let id = record.id();

        match records.iter_mut().find(|existing| existing.id() == id) {
            Some(existing) => {
                *existing = record.clone();
                tracing::trace!(%id, "record replaced");
            }
            None => {
                records.push(record.clone());
                tracing::trace!(%id, "record inserted");
            }
        }

        Ok(record)
    }
}
