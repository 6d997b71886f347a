//! Extension Storage Bindings
//!
//! `chrome.storage.{local,sync}` through the promise-returning extension API.

use async_trait::async_trait;
use fins_core::repository::{KeyValueStorage, StorageArea, StorageError, StorageItems, StorageResult};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = get)]
    async fn local_get(keys: JsValue) -> Result<JsValue, JsValue>;
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = set)]
    async fn local_set(items: JsValue) -> Result<JsValue, JsValue>;
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = remove)]
    async fn local_remove(keys: JsValue) -> Result<JsValue, JsValue>;
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = clear)]
    async fn local_clear() -> Result<JsValue, JsValue>;
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = getBytesInUse)]
    async fn local_bytes_in_use(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = get)]
    async fn sync_get(keys: JsValue) -> Result<JsValue, JsValue>;
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = set)]
    async fn sync_set(items: JsValue) -> Result<JsValue, JsValue>;
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = remove)]
    async fn sync_remove(keys: JsValue) -> Result<JsValue, JsValue>;
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = clear)]
    async fn sync_clear() -> Result<JsValue, JsValue>;
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = getBytesInUse)]
    async fn sync_bytes_in_use(keys: JsValue) -> Result<JsValue, JsValue>;
}

/// Storage facade over the browser extension storage areas
#[derive(Debug, Clone, Copy)]
pub struct ChromeStorage {
    /// Reported in quota errors
    sync_quota: u64,
}

impl ChromeStorage {
    pub fn new(sync_quota: u64) -> Self {
        Self { sync_quota }
    }

    /// Whether the page runs inside the extension (the API exists)
    pub fn available() -> bool {
        let global = js_sys::global();
        js_sys::Reflect::get(&global, &JsValue::from_str("chrome"))
            .and_then(|chrome| js_sys::Reflect::get(&chrome, &JsValue::from_str("storage")))
            .map(|storage| !storage.is_undefined())
            .unwrap_or(false)
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> StorageResult<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

fn host_error(area: StorageArea, quota: u64, err: JsValue) -> StorageError {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    log::error!("[ChromeStorage] {} area: {}", area, message);
    if message.contains("QUOTA_BYTES") {
        StorageError::QuotaExceeded {
            area,
            needed: 0,
            quota,
        }
    } else {
        StorageError::Host(message)
    }
}

#[async_trait(?Send)]
impl KeyValueStorage for ChromeStorage {
    async fn get(&self, keys: Option<&[&str]>, area: StorageArea) -> StorageResult<StorageItems> {
        let js_keys = match keys {
            Some(keys) => to_js(keys)?,
            None => JsValue::NULL,
        };
        let result = match area {
            StorageArea::Local => local_get(js_keys).await,
            StorageArea::Sync => sync_get(js_keys).await,
        }
        .map_err(|e| host_error(area, self.sync_quota, e))?;
        serde_wasm_bindgen::from_value(result).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn set(&self, items: StorageItems, area: StorageArea) -> StorageResult<()> {
        let js_items = to_js(&items)?;
        match area {
            StorageArea::Local => local_set(js_items).await,
            StorageArea::Sync => sync_set(js_items).await,
        }
        .map_err(|e| host_error(area, self.sync_quota, e))?;
        Ok(())
    }

    async fn remove(&self, keys: &[&str], area: StorageArea) -> StorageResult<()> {
        let js_keys = to_js(keys)?;
        match area {
            StorageArea::Local => local_remove(js_keys).await,
            StorageArea::Sync => sync_remove(js_keys).await,
        }
        .map_err(|e| host_error(area, self.sync_quota, e))?;
        Ok(())
    }

    async fn clear(&self, area: StorageArea) -> StorageResult<()> {
        match area {
            StorageArea::Local => local_clear().await,
            StorageArea::Sync => sync_clear().await,
        }
        .map_err(|e| host_error(area, self.sync_quota, e))?;
        Ok(())
    }

    async fn bytes_in_use(&self, area: StorageArea) -> StorageResult<u64> {
        let bytes = match area {
            StorageArea::Local => local_bytes_in_use(JsValue::NULL).await,
            StorageArea::Sync => sync_bytes_in_use(JsValue::NULL).await,
        }
        .map_err(|e| host_error(area, self.sync_quota, e))?;
        bytes
            .as_f64()
            .map(|b| b as u64)
            .ok_or_else(|| StorageError::Host("getBytesInUse returned a non-number".to_string()))
    }
}
