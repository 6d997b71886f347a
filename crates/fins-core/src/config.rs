//! Store configuration
//!
//! First-run defaults and fixed constants, gathered in one place so tests
//! (and forks of the extension) can swap them out.

use serde_json::json;

use crate::domain::{
    GridItem, Group, ItemSize, Props, SearchEngine, Widget, DEFAULT_TITLE, SYNC_QUOTA_BYTES,
};

/// Schema version stamped on every payload
pub const SCHEMA_VERSION: &str = "0.0.2";
/// Producer tag stamped on every payload
pub const PLATFORM_TAG: &str = "fins-extension";
/// Default toast lifetime in milliseconds
pub const DEFAULT_TOAST_MS: u32 = 3000;

pub const DEFAULT_HOME_GROUP: &str = "default_home";
pub const DEFAULT_WORK_GROUP: &str = "default_work";

/// Defaults and constants used by the stores
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub default_title: String,
    pub default_engines: Vec<SearchEngine>,
    pub default_groups: Vec<Group>,
    pub default_items: Vec<GridItem>,
    /// Byte quota of the sync area
    pub sync_quota: u64,
    pub toast_duration_ms: u32,
    pub schema_version: String,
    pub platform: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.to_string(),
            default_engines: default_engines(),
            default_groups: default_groups(),
            default_items: default_items(),
            sync_quota: SYNC_QUOTA_BYTES,
            toast_duration_ms: DEFAULT_TOAST_MS,
            schema_version: SCHEMA_VERSION.to_string(),
            platform: PLATFORM_TAG.to_string(),
        }
    }
}

impl StoreConfig {
    /// Id of the first default group, the fallback active group
    pub fn default_group_id(&self) -> String {
        self.default_groups
            .iter()
            .find(|g| g.is_default())
            .map(|g| g.id.clone())
            .unwrap_or_else(|| DEFAULT_HOME_GROUP.to_string())
    }
}

fn default_engines() -> Vec<SearchEngine> {
    vec![
        SearchEngine::new("Bing", "ri-search-2-line", "https://www.bing.com/search?q="),
        SearchEngine::new("Google", "ri-google-fill", "https://www.google.com/search?q="),
        SearchEngine::new("Baidu", "ri-baidu-fill", "https://www.baidu.com/s?wd="),
        SearchEngine::new("GitHub", "ri-github-fill", "https://github.com/search?q="),
    ]
}

fn default_groups() -> Vec<Group> {
    vec![
        Group::new(DEFAULT_HOME_GROUP, "Home", "ri-home-4-line").with_default(true),
        Group::new(DEFAULT_WORK_GROUP, "Work", "ri-briefcase-4-line").with_default(false),
    ]
}

fn link_card(id: &str, props: serde_json::Value) -> GridItem {
    let props: Props = match props {
        serde_json::Value::Object(map) => map,
        _ => Props::new(),
    };
    GridItem {
        id: id.to_string(),
        group_id: DEFAULT_HOME_GROUP.to_string(),
        size: ItemSize::OneByOne,
        widget: Widget::from_parts(Widget::LINK_CARD, props),
    }
}

fn default_items() -> Vec<GridItem> {
    vec![
        link_card(
            "1",
            json!({
                "name": "GitHub",
                "url": "https://github.com",
                "iconType": "remix",
                "iconValue": "ri-github-fill",
                "bgColor": "rgba(0,0,0,0.5)"
            }),
        ),
        link_card(
            "2",
            json!({
                "name": "YouTube",
                "url": "https://youtube.com",
                "iconType": "remix",
                "iconValue": "ri-youtube-fill",
                "bgColor": "rgba(255,0,0,0.4)"
            }),
        ),
        link_card(
            "3",
            json!({
                "name": "Fins Repo",
                "url": "https://github.com",
                "iconType": "text",
                "iconValue": "FN",
                "bgColor": "rgba(41, 151, 255, 0.5)"
            }),
        ),
    ]
}
