//! Domain Layer - Core Entity Trait
//!
//! Basic contract shared by groups and grid items, plus the error type
//! returned by store operations.

use thiserror::Error;

use crate::repository::StorageError;

/// Core trait for all dashboard entities
pub trait Entity: Sized + Clone {
    /// Returns the entity's unique identifier
    fn id(&self) -> &str;
}

/// Position of the entity with the given id inside a list
pub fn position_of<T: Entity>(list: &[T], id: &str) -> Option<usize> {
    list.iter().position(|entity| entity.id() == id)
}

/// Common result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Codec error: {0}")]
    Codec(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Codec(err.to_string())
    }
}
