//! Sync Service
//!
//! Full-state backup and cloud sync. The cloud copy is a single compressed
//! blob in the sync area; files are pretty-printed JSON of the same payload.

use std::rc::Rc;

use log::{error, info, warn};
use serde_json::Value;

use super::codec::{decode_payload, encode_payload};
use crate::config::StoreConfig;
use crate::domain::{
    backup_file_name, has_backup_marker, BackupPayload, BgMode, ExportFile, SearchEngine,
    StoreResult, KEY_BG_MODE, KEY_COMPRESSED, KEY_CURRENT_ENGINE, KEY_CURRENT_GROUP,
    KEY_CUSTOM_BG_URL, KEY_GROUPS, KEY_ITEMS, KEY_SEARCH_ENGINES, KEY_TITLE, LEGACY_KEY_GROUPS,
};
use crate::repository::{single_item, KeyValueStorage, StorageArea, StorageItems};
use crate::store::{
    parse_groups, parse_items, ConfirmOptions, ConfirmStore, GridRestore, GridStore, SettingStore,
    ToastStore,
};

/// How a sync flow ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The user declined the confirmation
    Cancelled,
    Completed,
    /// Nothing in the cloud to pull
    Empty,
    /// Input was not a usable backup
    Rejected,
    /// Storage or encoding failure
    Failed,
}

/// Build the backup payload from the current state
pub fn assemble_payload(grid: &GridStore, settings: &SettingStore, config: &StoreConfig) -> BackupPayload {
    let prefs = settings.settings();
    let snapshot = grid.snapshot();
    BackupPayload {
        fins_title: prefs.title,
        fins_bg_mode: prefs.bg_mode,
        fins_custom_bg_url: prefs.custom_bg_url,
        fins_search_engines: prefs.search_engines,
        fins_current_engine_index: prefs.current_engine_index,
        fins_v2_groups: snapshot.groups,
        fins_v2_items: snapshot.items,
        fins_current_group_id: snapshot.current_group_id,
        timestamp: chrono::Utc::now().timestamp_millis(),
        version: config.schema_version.clone(),
        platform: config.platform.clone(),
    }
}

#[derive(Clone)]
pub struct SyncService {
    grid: GridStore,
    settings: SettingStore,
    toast: ToastStore,
    confirm: ConfirmStore,
    storage: Rc<dyn KeyValueStorage>,
    config: Rc<StoreConfig>,
}

impl SyncService {
    pub fn new(
        grid: GridStore,
        settings: SettingStore,
        toast: ToastStore,
        confirm: ConfirmStore,
        storage: Rc<dyn KeyValueStorage>,
        config: Rc<StoreConfig>,
    ) -> Self {
        Self {
            grid,
            settings,
            toast,
            confirm,
            storage,
            config,
        }
    }

    pub fn full_data(&self) -> BackupPayload {
        assemble_payload(&self.grid, &self.settings, &self.config)
    }

    /// Apply a payload field by field. Missing or ill-typed fields keep their
    /// current value.
    pub fn restore_full_data(&self, data: &Value) {
        let Some(fields) = data.as_object() else {
            warn!("[SyncService] payload is not an object, nothing restored");
            return;
        };

        if let Some(title) = fields.get(KEY_TITLE).and_then(Value::as_str) {
            if !title.is_empty() {
                self.settings.set_title(title);
            }
        }
        if let Some(mode) = fields.get(KEY_BG_MODE).and_then(Value::as_str).and_then(BgMode::parse) {
            self.settings.set_bg_mode(mode);
        }
        if let Some(url) = fields.get(KEY_CUSTOM_BG_URL).and_then(Value::as_str) {
            self.settings.set_custom_bg_url(url);
        }
        if let Some(engines) = fields
            .get(KEY_SEARCH_ENGINES)
            .and_then(|v| serde_json::from_value::<Vec<SearchEngine>>(v.clone()).ok())
        {
            if let Err(e) = self.settings.set_engines(engines) {
                warn!("[SyncService] search engines not restored: {}", e);
            }
        }
        if let Some(index) = fields
            .get(KEY_CURRENT_ENGINE)
            .and_then(Value::as_u64)
            .and_then(|index| usize::try_from(index).ok())
        {
            if let Err(e) = self.settings.set_current_engine(index) {
                warn!("[SyncService] engine selection not restored: {}", e);
            }
        }

        let (groups, groups_unusable) = match fields.get(KEY_GROUPS) {
            Some(value) => match parse_groups(value) {
                Some(groups) => (Some(groups), false),
                None => {
                    warn!("[SyncService] payload groups unusable, skipping groups and items");
                    (None, true)
                }
            },
            None => {
                if fields.contains_key(LEGACY_KEY_GROUPS) {
                    self.toast
                        .warning("Old backup format detected. Some data structure might vary.");
                }
                (None, false)
            }
        };

        // Items only make sense next to the groups they were saved with
        let items = if groups_unusable {
            None
        } else {
            fields.get(KEY_ITEMS).and_then(parse_items)
        };

        self.grid.restore(GridRestore {
            groups,
            items,
            current_group_id: fields
                .get(KEY_CURRENT_GROUP)
                .and_then(Value::as_str)
                .map(str::to_string),
        });
    }

    // ========================
    // Cloud
    // ========================

    /// Replace the cloud copy with local state
    pub async fn push_to_cloud(&self) -> SyncOutcome {
        let options = ConfirmOptions::new("Overwrite Cloud Data?", "Overwrite cloud data with local data?");
        if !self.confirm.show(options).await {
            return SyncOutcome::Cancelled;
        }

        match self.upload().await {
            Ok(()) => {
                self.settings.update_sync_usage().await;
                info!("[SyncService] pushed state to cloud");
                self.toast.success("Upload Success!");
                SyncOutcome::Completed
            }
            Err(e) => {
                error!("[SyncService] upload failed: {}", e);
                self.toast.warning("Upload failed. Data might be too large.");
                SyncOutcome::Failed
            }
        }
    }

    async fn upload(&self) -> StoreResult<()> {
        let blob = encode_payload(&self.full_data())?;
        self.storage.clear(StorageArea::Sync).await?;
        self.storage
            .set(single_item(KEY_COMPRESSED, Value::String(blob)), StorageArea::Sync)
            .await?;
        Ok(())
    }

    /// Replace local state with the cloud copy
    pub async fn pull_from_cloud(&self) -> SyncOutcome {
        let options = ConfirmOptions::new("Overwrite Local Data?", "Overwrite local data with cloud data?");
        if !self.confirm.show(options).await {
            return SyncOutcome::Cancelled;
        }

        let cloud = match self.storage.get(None, StorageArea::Sync).await {
            Ok(cloud) => cloud,
            Err(e) => {
                error!("[SyncService] download failed: {}", e);
                self.toast.error("Download failed.");
                return SyncOutcome::Failed;
            }
        };
        if cloud.is_empty() {
            self.toast.info("Cloud storage is empty.");
            return SyncOutcome::Empty;
        }

        let Some(payload) = resolve_cloud_payload(cloud) else {
            self.toast.error("Unknown data format in cloud.");
            return SyncOutcome::Rejected;
        };
        self.restore_full_data(&payload);
        info!("[SyncService] pulled state from cloud");
        self.toast.success("Download Success!");
        SyncOutcome::Completed
    }

    pub async fn clear_cloud_data(&self) -> SyncOutcome {
        let options = ConfirmOptions::new("Clear Cloud Data?", "Permanently delete cloud data?")
            .confirm_text("Delete")
            .danger();
        if !self.confirm.show(options).await {
            return SyncOutcome::Cancelled;
        }

        match self.storage.clear(StorageArea::Sync).await {
            Ok(()) => {
                self.settings.update_sync_usage().await;
                self.toast.success("Cloud storage cleared.");
                SyncOutcome::Completed
            }
            Err(e) => {
                error!("[SyncService] clear failed: {}", e);
                self.toast.error("Failed to clear cloud storage.");
                SyncOutcome::Failed
            }
        }
    }

    // ========================
    // Files
    // ========================

    /// Pretty JSON backup named after today's date
    pub fn export_file(&self) -> StoreResult<ExportFile> {
        let contents = serde_json::to_string_pretty(&self.full_data())?;
        Ok(ExportFile {
            file_name: backup_file_name(chrono::Local::now().date_naive()),
            contents,
        })
    }

    /// Restore from the text of a backup file
    pub async fn import_file(&self, text: &str) -> SyncOutcome {
        let data: Value = match serde_json::from_str(text) {
            Ok(data) => data,
            Err(e) => {
                warn!("[SyncService] import parse error: {}", e);
                self.toast.error("Failed to parse JSON file.");
                return SyncOutcome::Rejected;
            }
        };
        if !has_backup_marker(&data) {
            self.toast.error("Invalid Fins backup file.");
            return SyncOutcome::Rejected;
        }

        let options = ConfirmOptions::new(
            "Restore Data?",
            "Restore data from file? Current data will be overwritten.",
        );
        if !self.confirm.show(options).await {
            return SyncOutcome::Cancelled;
        }

        self.restore_full_data(&data);
        self.toast.success("Import Success!");
        SyncOutcome::Completed
    }
}

/// Find the payload in a non-empty sync area.
///
/// The compressed blob wins. If it cannot be read, the remaining raw keys are
/// used when they look like a backup. Without a blob the raw keys are a
/// legacy uncompressed payload.
fn resolve_cloud_payload(mut cloud: StorageItems) -> Option<Value> {
    let Some(blob) = cloud.remove(KEY_COMPRESSED) else {
        return Some(Value::Object(cloud));
    };

    if let Some(payload) = blob.as_str().and_then(decode_payload) {
        return Some(payload);
    }
    warn!("[SyncService] compressed cloud data unreadable, trying raw keys");
    let raw = Value::Object(cloud);
    has_backup_marker(&raw).then_some(raw)
}
