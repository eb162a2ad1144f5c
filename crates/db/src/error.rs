use thiserror::Error;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by a record store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate record id {0}")]
    DuplicateId(Uuid),

    #[error("invalid seed data: {0}")]
    Seed(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
