//! Settings Entity
//!
//! Display and search preferences plus sync bookkeeping.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Fixed byte quota of the browser sync area (100 KB)
pub const SYNC_QUOTA_BYTES: u64 = 102_400;

/// Title used when the user clears the title
pub const DEFAULT_TITLE: &str = "Fins";

/// Background source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BgMode {
    /// Daily Bing wallpaper
    #[default]
    Bing,
    /// User supplied image URL
    Custom,
}

impl BgMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BgMode::Bing => "bing",
            BgMode::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bing" => Some(BgMode::Bing),
            "custom" => Some(BgMode::Custom),
            _ => None,
        }
    }
}

/// A search engine entry; the query is appended to `url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEngine {
    pub name: String,
    pub icon: String,
    pub url: String,
}

impl SearchEngine {
    pub fn new(name: impl Into<String>, icon: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            url: url.into(),
        }
    }

    /// Full search URL for a query
    pub fn search_url(&self, query: &str) -> String {
        format!("{}{}", self.url, encode_query(query))
    }
}

/// Characters `encodeURIComponent` leaves untouched
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode_query(query: &str) -> String {
    utf8_percent_encode(query, QUERY_COMPONENT).to_string()
}

/// The settings record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub title: String,
    pub bg_mode: BgMode,
    pub custom_bg_url: String,
    pub search_engines: Vec<SearchEngine>,
    pub current_engine_index: usize,
    pub sync_enabled: bool,
    /// Last observed bytes in use of the sync area
    pub sync_usage: u64,
    /// Byte quota of the sync area, taken from the store config
    pub sync_quota: u64,
}

impl Settings {
    /// Currently selected engine, falling back to the first one
    pub fn current_engine(&self) -> Option<&SearchEngine> {
        self.search_engines
            .get(self.current_engine_index)
            .or_else(|| self.search_engines.first())
    }

    /// Sync usage as a fraction of the quota, clamped to 1.0
    pub fn sync_usage_ratio(&self) -> f64 {
        if self.sync_quota == 0 {
            return 1.0;
        }
        (self.sync_usage as f64 / self.sync_quota as f64).min(1.0)
    }
}
