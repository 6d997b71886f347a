//! Setting Store
//!
//! Display and search preferences plus the observed sync usage.

use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};
use serde_json::Value;

use super::events::{Change, ChangeSender};
use super::toast::ToastStore;
use crate::config::StoreConfig;
use crate::domain::{
    BgMode, SearchEngine, Settings, StoreError, StoreResult, DEFAULT_TITLE, KEY_BG_MODE,
    KEY_CURRENT_ENGINE, KEY_CUSTOM_BG_URL, KEY_SEARCH_ENGINES, KEY_SYNC_ENABLED, KEY_TITLE,
    SETTING_KEYS,
};
use crate::repository::{KeyValueStorage, StorageArea, StorageItems};

#[derive(Debug)]
struct SettingState {
    settings: Settings,
    initialized: bool,
}

/// Shared handle to the preferences
#[derive(Clone)]
pub struct SettingStore {
    state: Rc<RefCell<SettingState>>,
    storage: Rc<dyn KeyValueStorage>,
    toast: ToastStore,
    changes: ChangeSender,
}

impl SettingStore {
    pub fn new(
        storage: Rc<dyn KeyValueStorage>,
        config: &StoreConfig,
        toast: ToastStore,
        changes: ChangeSender,
    ) -> Self {
        let settings = Settings {
            title: config.default_title.clone(),
            bg_mode: BgMode::default(),
            custom_bg_url: String::new(),
            search_engines: config.default_engines.clone(),
            current_engine_index: 0,
            sync_enabled: false,
            sync_usage: 0,
            sync_quota: config.sync_quota,
        };
        Self {
            state: Rc::new(RefCell::new(SettingState {
                settings,
                initialized: false,
            })),
            storage,
            toast,
            changes,
        }
    }

    /// Load persisted preferences, field by field. Idempotent.
    pub async fn init(&self) -> StoreResult<()> {
        if self.is_initialized() {
            return Ok(());
        }

        let stored = self.storage.get(Some(&SETTING_KEYS[..]), StorageArea::Local).await?;
        let sync_enabled = {
            let mut state = self.state.borrow_mut();
            apply_stored(&mut state.settings, &stored);
            state.initialized = true;
            info!(
                "[SettingStore] loaded '{}', {} engines, sync {}",
                state.settings.title,
                state.settings.search_engines.len(),
                state.settings.sync_enabled
            );
            state.settings.sync_enabled
        };

        if sync_enabled {
            self.update_sync_usage().await;
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    /// Refresh the observed sync usage; failures keep the previous value
    pub async fn update_sync_usage(&self) {
        match self.storage.bytes_in_use(StorageArea::Sync).await {
            Ok(bytes) => self.state.borrow_mut().settings.sync_usage = bytes,
            Err(e) => warn!("[SettingStore] sync storage not available: {}", e),
        }
    }

    // ========================
    // Accessors
    // ========================

    pub fn settings(&self) -> Settings {
        self.state.borrow().settings.clone()
    }

    pub fn sync_enabled(&self) -> bool {
        self.state.borrow().settings.sync_enabled
    }

    pub fn current_engine(&self) -> Option<SearchEngine> {
        self.state.borrow().settings.current_engine().cloned()
    }

    /// Search URL of the selected engine for `query`
    pub fn search_url(&self, query: &str) -> Option<String> {
        self.current_engine().map(|engine| engine.search_url(query))
    }

    // ========================
    // Setters
    // ========================

    /// Empty titles fall back to the default
    pub fn set_title(&self, title: &str) {
        let title = if title.is_empty() { DEFAULT_TITLE } else { title };
        self.update(|s| {
            if s.title == title {
                return false;
            }
            s.title = title.to_string();
            true
        });
    }

    pub fn set_bg_mode(&self, mode: BgMode) {
        self.update(|s| {
            let changed = s.bg_mode != mode;
            s.bg_mode = mode;
            changed
        });
    }

    pub fn set_custom_bg_url(&self, url: &str) {
        self.update(|s| {
            if s.custom_bg_url == url {
                return false;
            }
            s.custom_bg_url = url.to_string();
            true
        });
    }

    /// Toggle cloud mirroring; enabling refreshes the usage figure
    pub async fn set_sync_enabled(&self, enabled: bool) {
        self.update(|s| {
            let changed = s.sync_enabled != enabled;
            s.sync_enabled = enabled;
            changed
        });
        if enabled {
            self.update_sync_usage().await;
        }
    }

    // ========================
    // Search engines
    // ========================

    pub fn add_engine(&self, engine: SearchEngine) {
        self.update(|s| {
            s.search_engines.push(engine);
            true
        });
    }

    /// Remove an engine, never the last one
    pub fn remove_engine(&self, index: usize) -> StoreResult<()> {
        let len = self.state.borrow().settings.search_engines.len();
        if len <= 1 {
            self.toast.info("Keep at least one engine.");
            return Err(StoreError::Forbidden("last search engine".to_string()));
        }
        if index >= len {
            return Err(StoreError::NotFound(format!("engine #{}", index)));
        }
        self.update(|s| {
            s.search_engines.remove(index);
            if index <= s.current_engine_index {
                s.current_engine_index = 0;
            }
            true
        });
        Ok(())
    }

    pub fn update_engine(&self, index: usize, engine: SearchEngine) -> StoreResult<()> {
        self.try_update(|s| {
            let slot = s
                .search_engines
                .get_mut(index)
                .ok_or_else(|| StoreError::NotFound(format!("engine #{}", index)))?;
            let changed = *slot != engine;
            *slot = engine;
            Ok(changed)
        })
    }

    pub fn set_current_engine(&self, index: usize) -> StoreResult<()> {
        self.try_update(|s| {
            if index >= s.search_engines.len() {
                return Err(StoreError::NotFound(format!("engine #{}", index)));
            }
            let changed = s.current_engine_index != index;
            s.current_engine_index = index;
            Ok(changed)
        })
    }

    /// Replace the engine list wholesale; the selection is clamped into range
    pub fn set_engines(&self, engines: Vec<SearchEngine>) -> StoreResult<()> {
        if engines.is_empty() {
            return Err(StoreError::InvalidInput("engine list is empty".to_string()));
        }
        self.update(|s| {
            let changed = s.search_engines != engines;
            s.search_engines = engines;
            if s.current_engine_index >= s.search_engines.len() {
                s.current_engine_index = 0;
                return true;
            }
            changed
        });
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Settings) -> bool) {
        let changed = f(&mut self.state.borrow_mut().settings);
        if changed {
            self.changes.publish(Change::Settings);
        }
    }

    fn try_update(&self, f: impl FnOnce(&mut Settings) -> StoreResult<bool>) -> StoreResult<()> {
        let changed = f(&mut self.state.borrow_mut().settings)?;
        if changed {
            self.changes.publish(Change::Settings);
        }
        Ok(())
    }
}

/// Overlay stored values that are present and well typed
fn apply_stored(settings: &mut Settings, stored: &StorageItems) {
    if let Some(title) = stored.get(KEY_TITLE).and_then(Value::as_str).filter(|t| !t.is_empty()) {
        settings.title = title.to_string();
    }
    if let Some(mode) = stored.get(KEY_BG_MODE).and_then(Value::as_str).and_then(BgMode::parse) {
        settings.bg_mode = mode;
    }
    if let Some(url) = stored.get(KEY_CUSTOM_BG_URL).and_then(Value::as_str) {
        settings.custom_bg_url = url.to_string();
    }
    if let Some(engines) = stored
        .get(KEY_SEARCH_ENGINES)
        .and_then(|v| serde_json::from_value::<Vec<SearchEngine>>(v.clone()).ok())
        .filter(|engines| !engines.is_empty())
    {
        settings.search_engines = engines;
    }
    if let Some(index) = stored
        .get(KEY_CURRENT_ENGINE)
        .and_then(Value::as_u64)
        .and_then(|index| usize::try_from(index).ok())
    {
        if index < settings.search_engines.len() {
            settings.current_engine_index = index;
        }
    }
    if let Some(enabled) = stored.get(KEY_SYNC_ENABLED).and_then(Value::as_bool) {
        settings.sync_enabled = enabled;
    }
}

/// The six preference keys as written to the local area
pub(crate) fn settings_items(settings: &Settings) -> StorageItems {
    let mut items = StorageItems::new();
    items.insert(KEY_TITLE.to_string(), Value::from(settings.title.clone()));
    items.insert(KEY_BG_MODE.to_string(), Value::from(settings.bg_mode.as_str()));
    items.insert(
        KEY_CUSTOM_BG_URL.to_string(),
        Value::from(settings.custom_bg_url.clone()),
    );
    items.insert(
        KEY_SEARCH_ENGINES.to_string(),
        serde_json::to_value(&settings.search_engines).unwrap_or(Value::Array(Vec::new())),
    );
    items.insert(
        KEY_CURRENT_ENGINE.to_string(),
        Value::from(settings.current_engine_index as u64),
    );
    items.insert(KEY_SYNC_ENABLED.to_string(), Value::from(settings.sync_enabled));
    items
}
