//! File Commands
//!
//! Backup download and upload through the DOM.

use fins_core::domain::ExportFile;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, HtmlInputElement, Url};

fn js_err(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

/// Save `file` through a temporary object URL
pub fn download_file(file: &ExportFile) -> Result<(), String> {
    let parts = js_sys::Array::of1(&JsValue::from_str(&file.contents));
    let options = BlobPropertyBag::new();
    options.set_type(ExportFile::MIME_TYPE);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(js_err)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(js_err)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "document not available".to_string())?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_err)?
        .dyn_into()
        .map_err(|_| "not an anchor element".to_string())?;
    anchor.set_href(&url);
    anchor.set_download(&file.file_name);
    anchor.click();

    Url::revoke_object_url(&url).map_err(js_err)
}

/// Text of the first file picked in `input`, `None` when nothing was picked
pub async fn read_selected_file(input: &HtmlInputElement) -> Result<Option<String>, String> {
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };
    let text = JsFuture::from(file.text()).await.map_err(js_err)?;
    // Allow picking the same file again
    input.set_value("");
    text.as_string()
        .map(Some)
        .ok_or_else(|| "file is not text".to_string())
}
