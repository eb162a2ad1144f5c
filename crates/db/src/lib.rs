//! Record store collaborator for the bookshelf service.
//!
//! The store is deliberately small: fetch everything, fetch one record by
//! id, scan with a [`Filter`], and upsert. Any engine offering those four
//! operations can stand behind [`RecordStore`]; [`MemoryStore`] is the one
//! the service ships with.

use async_trait::async_trait;
use uuid::Uuid;

pub mod error;
pub mod filter;
pub mod memory;
pub mod seed;

pub use error::{StoreError, StoreResult};
pub use filter::Filter;
pub use memory::MemoryStore;
pub use seed::{load_seed, parse_seed};

/// A value that can be kept in a [`RecordStore`].
pub trait Record: Clone + Send + Sync + 'static {
    /// Stable, unique identifier of the record.
    fn id(&self) -> Uuid;
}

/// Persistence contract required by the query/update engine.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Every record, in the store's natural order.
    async fn get_all(&self) -> StoreResult<Vec<T>>;

    /// The record with the given id, if any.
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<T>>;

    /// Records satisfying every predicate of `filter`, in natural order.
    async fn scan(&self, filter: &Filter<T>) -> StoreResult<Vec<T>>;

    /// Insert or replace the record with the same id and return it.
    async fn save(&self, record: T) -> StoreResult<T>;
}
