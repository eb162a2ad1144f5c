//! Store double that records every call made by the engine.

use std::sync::Mutex;

use async_trait::async_trait;
use bookshelf_db::{Filter, MemoryStore, RecordStore, StoreError, StoreResult};
use uuid::Uuid;

use super::models::Book;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    GetAll,
    FindById(Uuid),
    Scan { criteria: usize },
    Save(Uuid),
}

pub struct SpyStore {
    inner: MemoryStore<Book>,
    calls: Mutex<Vec<StoreCall>>,
    failing: bool,
}

impl SpyStore {
    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            inner: MemoryStore::with_records(books).expect("unique test ids"),
            calls: Mutex::new(Vec::new()),
            failing: false,
        }
    }

    /// Store whose every call fails as if the backend were down.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::with_books(Vec::new())
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Current contents, read without being recorded.
    pub async fn snapshot(&self) -> Vec<Book> {
        self.inner.get_all().await.expect("memory store read")
    }

    fn record(&self, call: StoreCall) -> StoreResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing {
            return Err(StoreError::Unavailable("backend offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore<Book> for SpyStore {
    async fn get_all(&self) -> StoreResult<Vec<Book>> {
        self.record(StoreCall::GetAll)?;
        self.inner.get_all().await
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Book>> {
        self.record(StoreCall::FindById(id))?;
        self.inner.find_by_id(id).await
    }

    async fn scan(&self, filter: &Filter<Book>) -> StoreResult<Vec<Book>> {
        self.record(StoreCall::Scan {
            criteria: filter.len(),
        })?;
        self.inner.scan(filter).await
    }

    async fn save(&self, record: Book) -> StoreResult<Book> {
        self.record(StoreCall::Save(record.id))?;
        self.inner.save(record).await
    }
}
