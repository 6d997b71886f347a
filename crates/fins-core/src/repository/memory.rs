//! In-Memory Storage
//!
//! `KeyValueStorage` backed by process memory. Enforces a byte quota per area
//! the way the browser does and can be switched off to simulate a missing
//! host API. Used by tests and by native tooling.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;

use super::traits::{KeyValueStorage, StorageArea, StorageError, StorageItems, StorageResult};
use crate::config::StoreConfig;
use crate::domain::SYNC_QUOTA_BYTES;

/// In-memory two-area store
#[derive(Debug)]
pub struct MemoryStorage {
    areas: RefCell<HashMap<StorageArea, StorageItems>>,
    quotas: HashMap<StorageArea, u64>,
    unavailable: Cell<bool>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    /// Unlimited local area, sync area capped at the browser quota
    pub fn new() -> Self {
        let mut quotas = HashMap::new();
        quotas.insert(StorageArea::Sync, SYNC_QUOTA_BYTES);
        Self {
            areas: RefCell::new(HashMap::new()),
            quotas,
            unavailable: Cell::new(false),
        }
    }

    /// Sync area capped at the configured quota
    pub fn for_config(config: &StoreConfig) -> Self {
        Self::new().with_quota(StorageArea::Sync, config.sync_quota)
    }

    /// Override the quota of one area
    pub fn with_quota(mut self, area: StorageArea, bytes: u64) -> Self {
        self.quotas.insert(area, bytes);
        self
    }

    /// Make every call fail with `StorageError::Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    /// Copy of an area's contents
    pub fn snapshot(&self, area: StorageArea) -> StorageItems {
        self.areas.borrow().get(&area).cloned().unwrap_or_default()
    }

    fn check(&self, area: StorageArea) -> StorageResult<()> {
        if self.unavailable.get() {
            Err(StorageError::Unavailable(area))
        } else {
            Ok(())
        }
    }
}

/// Usage in UTF-16 code units: every key plus its JSON-serialized value
pub fn measure_usage(items: &StorageItems) -> u64 {
    items
        .iter()
        .map(|(key, value)| {
            let json = value.to_string();
            (key.encode_utf16().count() + json.encode_utf16().count()) as u64
        })
        .sum()
}

#[async_trait(?Send)]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, keys: Option<&[&str]>, area: StorageArea) -> StorageResult<StorageItems> {
        self.check(area)?;
        let areas = self.areas.borrow();
        let Some(stored) = areas.get(&area) else {
            return Ok(StorageItems::new());
        };

        let result = match keys {
            None => stored.clone(),
            Some(keys) => keys
                .iter()
                .filter_map(|key| stored.get(*key).map(|v| (key.to_string(), v.clone())))
                .collect(),
        };
        Ok(result)
    }

    async fn set(&self, items: StorageItems, area: StorageArea) -> StorageResult<()> {
        self.check(area)?;
        let mut areas = self.areas.borrow_mut();
        let mut next = areas.get(&area).cloned().unwrap_or_default();
        for (key, value) in items {
            next.insert(key, value);
        }

        if let Some(&quota) = self.quotas.get(&area) {
            let needed = measure_usage(&next);
            if needed > quota {
                return Err(StorageError::QuotaExceeded { area, needed, quota });
            }
        }

        debug!("[MemoryStorage] set {} keys in {}", next.len(), area);
        areas.insert(area, next);
        Ok(())
    }

    async fn remove(&self, keys: &[&str], area: StorageArea) -> StorageResult<()> {
        self.check(area)?;
        if let Some(stored) = self.areas.borrow_mut().get_mut(&area) {
            for key in keys {
                stored.remove(*key);
            }
        }
        Ok(())
    }

    async fn clear(&self, area: StorageArea) -> StorageResult<()> {
        self.check(area)?;
        self.areas.borrow_mut().remove(&area);
        Ok(())
    }

    async fn bytes_in_use(&self, area: StorageArea) -> StorageResult<u64> {
        self.check(area)?;
        Ok(self
            .areas
            .borrow()
            .get(&area)
            .map(measure_usage)
            .unwrap_or(0))
    }
}
