//! Backup Payload
//!
//! The full exportable/importable/syncable snapshot and the storage keys
//! shared by local persistence, cloud sync and file backups.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::group::Group;
use super::item::GridItem;
use super::settings::{BgMode, SearchEngine};

// ========================
// Storage Keys
// ========================

pub const KEY_GROUPS: &str = "fins_v2_groups";
pub const KEY_ITEMS: &str = "fins_v2_items";
pub const KEY_CURRENT_GROUP: &str = "fins_current_group_id";
pub const KEY_TITLE: &str = "fins_title";
pub const KEY_BG_MODE: &str = "fins_bg_mode";
pub const KEY_CUSTOM_BG_URL: &str = "fins_custom_bg_url";
pub const KEY_SEARCH_ENGINES: &str = "fins_search_engines";
pub const KEY_CURRENT_ENGINE: &str = "fins_current_engine_index";
pub const KEY_SYNC_ENABLED: &str = "fins_sync_enabled";

/// Single key holding the compressed payload in the sync area
pub const KEY_COMPRESSED: &str = "fins_compressed_data";

/// Group list key of the pre-v2 format (detected, never migrated)
pub const LEGACY_KEY_GROUPS: &str = "fins_groups";
/// Link list key of the pre-v2 format
pub const LEGACY_KEY_LINKS: &str = "fins_links";

/// Preference keys loaded by the setting store
pub const SETTING_KEYS: [&str; 6] = [
    KEY_TITLE,
    KEY_BG_MODE,
    KEY_CUSTOM_BG_URL,
    KEY_SEARCH_ENGINES,
    KEY_CURRENT_ENGINE,
    KEY_SYNC_ENABLED,
];

/// Full snapshot as written by export, push and the sync mirror.
///
/// Every field is present on write. Reading goes through
/// `SyncService::restore_full_data`, which inspects a raw JSON value field by
/// field so partial or foreign payloads can still be applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupPayload {
    pub fins_title: String,
    pub fins_bg_mode: BgMode,
    pub fins_custom_bg_url: String,
    pub fins_search_engines: Vec<SearchEngine>,
    pub fins_current_engine_index: usize,
    pub fins_v2_groups: Vec<Group>,
    pub fins_v2_items: Vec<GridItem>,
    pub fins_current_group_id: String,
    /// Export time, epoch milliseconds
    pub timestamp: i64,
    pub version: String,
    pub platform: String,
}

/// True if the value carries at least one field identifying a Fins backup
pub fn has_backup_marker(value: &Value) -> bool {
    let Some(map) = value.as_object() else {
        return false;
    };
    [KEY_ITEMS, LEGACY_KEY_LINKS, "version"]
        .iter()
        .any(|key| map.get(*key).map_or(false, |v| !v.is_null()))
}

/// A backup file ready to be offered as a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

impl ExportFile {
    pub const MIME_TYPE: &'static str = "application/json";
}

/// Download name for a backup taken on the given date
pub fn backup_file_name(date: chrono::NaiveDate) -> String {
    format!("fins_backup_{}.json", date.format("%Y-%m-%d"))
}
