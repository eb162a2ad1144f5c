//! Bootstrap records from a JSON document.
//!
//! A seed is a JSON array of records. It is read once at startup, before the
//! store begins serving requests.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{MemoryStore, Record, StoreError, StoreResult};

/// Parse a JSON array of records.
pub fn parse_seed<T: DeserializeOwned>(json: &str) -> StoreResult<Vec<T>> {
    serde_json::from_str(json).map_err(|e| StoreError::Seed(e.to_string()))
}

/// Read a seed file and build a store from it.
pub fn load_seed<T>(path: impl AsRef<Path>) -> StoreResult<MemoryStore<T>>
where
    T: Record + DeserializeOwned,
{
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| StoreError::Seed(format!("{}: {}", path.display(), e)))?;

    let records = parse_seed(&json)?;
    tracing::info!(
        path = %path.display(),
        records = records.len(),
        "seed loaded"
    );

    MemoryStore::with_records(records)
}
