//! Persister
//!
//! Subscribes to store changes and writes the affected slice to local
//! storage. Item and group changes are mirrored to the sync area as one
//! compressed payload while sync is enabled.

use std::rc::Rc;

use futures::StreamExt;
use log::{debug, error};
use serde_json::Value;

use super::events::{Change, ChangeReceiver};
use super::grid::GridStore;
use super::settings::{settings_items, SettingStore};
use crate::config::StoreConfig;
use crate::domain::{KEY_COMPRESSED, KEY_CURRENT_GROUP, KEY_GROUPS, KEY_ITEMS};
use crate::repository::{single_item, KeyValueStorage, StorageArea, StorageItems};
use crate::sync::{assemble_payload, encode_payload};

pub struct Persister {
    receiver: ChangeReceiver,
    grid: GridStore,
    settings: SettingStore,
    storage: Rc<dyn KeyValueStorage>,
    config: Rc<StoreConfig>,
}

impl Persister {
    pub fn new(
        receiver: ChangeReceiver,
        grid: GridStore,
        settings: SettingStore,
        storage: Rc<dyn KeyValueStorage>,
        config: Rc<StoreConfig>,
    ) -> Self {
        Self {
            receiver,
            grid,
            settings,
            storage,
            config,
        }
    }

    /// Write every change published so far. Returns the number of distinct
    /// changes handled.
    pub async fn flush(&mut self) -> usize {
        let mut pending = Vec::new();
        self.drain_into(&mut pending);
        self.write_all(&pending).await;
        pending.len()
    }

    /// Persist changes as they arrive, until every store handle is dropped
    pub async fn run(mut self) {
        while let Some(change) = self.receiver.next().await {
            let mut pending = vec![change];
            self.drain_into(&mut pending);
            self.write_all(&pending).await;
        }
        debug!("[Persister] change channel closed");
    }

    fn drain_into(&mut self, pending: &mut Vec<Change>) {
        while let Ok(Some(change)) = self.receiver.try_next() {
            if !pending.contains(&change) {
                pending.push(change);
            }
        }
    }

    async fn write_all(&self, pending: &[Change]) {
        let mut mirror = false;
        for change in pending {
            mirror |= self.write(*change).await;
        }
        if mirror && self.settings.sync_enabled() {
            self.mirror_to_sync().await;
        }
    }

    /// Returns whether the change should reach the sync mirror
    async fn write(&self, change: Change) -> bool {
        match change {
            Change::Items | Change::Groups | Change::CurrentGroup if !self.grid.is_initialized() => {
                debug!("[Persister] grid not loaded, skipping {:?}", change);
                false
            }
            Change::Settings if !self.settings.is_initialized() => {
                debug!("[Persister] settings not loaded, skipping");
                false
            }
            Change::Items => {
                self.put_json(KEY_ITEMS, serde_json::to_value(self.grid.items()))
                    .await;
                true
            }
            Change::Groups => {
                self.put_json(KEY_GROUPS, serde_json::to_value(self.grid.groups()))
                    .await;
                true
            }
            Change::CurrentGroup => {
                let id = Value::String(self.grid.current_group_id());
                self.put(single_item(KEY_CURRENT_GROUP, id), StorageArea::Local)
                    .await;
                false
            }
            Change::Settings => {
                let items = settings_items(&self.settings.settings());
                self.put(items, StorageArea::Local).await;
                false
            }
        }
    }

    async fn mirror_to_sync(&self) {
        let payload = assemble_payload(&self.grid, &self.settings, &self.config);
        match encode_payload(&payload) {
            Ok(blob) => {
                self.put(single_item(KEY_COMPRESSED, Value::String(blob)), StorageArea::Sync)
                    .await;
                self.settings.update_sync_usage().await;
            }
            Err(e) => error!("[Persister] failed to encode sync payload: {}", e),
        }
    }

    async fn put_json(&self, key: &str, value: serde_json::Result<Value>) {
        match value {
            Ok(value) => self.put(single_item(key, value), StorageArea::Local).await,
            Err(e) => error!("[Persister] failed to serialize '{}': {}", key, e),
        }
    }

    async fn put(&self, items: StorageItems, area: StorageArea) {
        if let Err(e) = self.storage.set(items, area).await {
            error!("[Persister] write to {} failed: {}", area, e);
        }
    }
}
