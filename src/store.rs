//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The dashboard
//! stores in `fins-core` own the data; this is the view's copy, refreshed
//! after every change.

use fins_core::domain::{BgMode, GridItem, Group, SearchEngine};
use fins_core::store::Toast;
use fins_core::{ConfirmOptions, Dashboard};
use leptos::prelude::*;
use reactive_stores::Store;

/// What the page renders, with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    pub groups: Vec<Group>,
    pub current_group_id: String,
    /// Items of the active group
    pub current_items: Vec<GridItem>,
    pub title: String,
    pub bg_mode: BgMode,
    pub custom_bg_url: String,
    pub search_engines: Vec<SearchEngine>,
    pub current_engine_index: usize,
    pub sync_enabled: bool,
    pub sync_usage: u64,
    pub sync_quota: u64,
    /// Share of the sync quota in use, 0.0 to 1.0
    pub sync_usage_ratio: f64,
    pub toasts: Vec<Toast>,
    /// Visible confirm dialog
    pub confirm: Option<ConfirmOptions>,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Write a store field only when the value differs
macro_rules! refresh_field {
    ($field:expr, $value:expr) => {{
        let value = $value;
        let field = $field;
        if field.with_untracked(|current| *current != value) {
            *field.write() = value;
        }
    }};
}

/// Copy the dashboard state into the view store. Untouched fields do not
/// notify their views.
pub fn store_refresh(store: &AppStore, app: &Dashboard) {
    let settings = app.settings.settings();
    let usage_ratio = settings.sync_usage_ratio();

    refresh_field!(store.groups(), app.grid.groups());
    refresh_field!(store.current_group_id(), app.grid.current_group_id());
    refresh_field!(store.current_items(), app.grid.current_items());
    refresh_field!(store.title(), settings.title);
    refresh_field!(store.bg_mode(), settings.bg_mode);
    refresh_field!(store.custom_bg_url(), settings.custom_bg_url);
    refresh_field!(store.search_engines(), settings.search_engines);
    refresh_field!(store.current_engine_index(), settings.current_engine_index);
    refresh_field!(store.sync_enabled(), settings.sync_enabled);
    refresh_field!(store.sync_usage(), settings.sync_usage);
    refresh_field!(store.sync_quota(), settings.sync_quota);
    refresh_field!(store.sync_usage_ratio(), usage_ratio);
    refresh_field!(store.toasts(), app.toast.toasts());
    refresh_field!(store.confirm(), app.confirm.current());
}
