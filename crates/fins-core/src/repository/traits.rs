//! Repository Layer - Core Traits
//!
//! The key-value storage facade the stores persist through. It mirrors the
//! browser extension storage API: two named areas, JSON values, asynchronous
//! calls that may fail (quota exceeded, API unavailable).

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// A storage partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageArea {
    /// Large, device-only
    Local,
    /// Small quota, shared across the user's devices
    Sync,
}

impl StorageArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageArea::Local => "local",
            StorageArea::Sync => "sync",
        }
    }
}

impl fmt::Display for StorageArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keys and values of one `get`/`set` call
pub type StorageItems = Map<String, Value>;

pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced by a storage backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("storage area '{0}' is not available")]
    Unavailable(StorageArea),
    #[error("quota exceeded in '{area}' area: {needed} of {quota} bytes")]
    QuotaExceeded {
        area: StorageArea,
        needed: u64,
        quota: u64,
    },
    #[error("serialization failed: {0}")]
    Serialization(String),
    #[error("host storage error: {0}")]
    Host(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Asynchronous key-value storage with `local` and `sync` areas.
///
/// Futures are not `Send`: the extension runs on the single browser thread.
#[async_trait(?Send)]
pub trait KeyValueStorage {
    /// Read the given keys, or the whole area when `keys` is `None`.
    /// Missing keys are simply absent from the result.
    async fn get(&self, keys: Option<&[&str]>, area: StorageArea) -> StorageResult<StorageItems>;

    /// Write all items, replacing existing values
    async fn set(&self, items: StorageItems, area: StorageArea) -> StorageResult<()>;

    /// Delete the given keys; unknown keys are ignored
    async fn remove(&self, keys: &[&str], area: StorageArea) -> StorageResult<()>;

    /// Delete everything in the area
    async fn clear(&self, area: StorageArea) -> StorageResult<()>;

    /// Bytes currently used by the whole area
    async fn bytes_in_use(&self, area: StorageArea) -> StorageResult<u64>;
}

/// Build a one-entry item map
pub fn single_item(key: &str, value: Value) -> StorageItems {
    let mut items = StorageItems::new();
    items.insert(key.to_string(), value);
    items
}
