//! Payload codec
//!
//! LZ-String, UTF-16 variant: the output is a string of valid UTF-16 code
//! units that browser sync storage accepts as-is.

use log::warn;
use serde_json::Value;

use crate::domain::{BackupPayload, StoreResult};

pub fn compress(text: &str) -> String {
    lz_str::compress_to_utf16(text)
}

/// `None` for data that is not an LZ-String stream
pub fn decompress(data: &str) -> Option<String> {
    let units = lz_str::decompress_from_utf16(data)?;
    match String::from_utf16(&units) {
        Ok(text) if !text.is_empty() => Some(text),
        Ok(_) => None,
        Err(e) => {
            warn!("[codec] decompressed data is not UTF-16: {}", e);
            None
        }
    }
}

/// JSON-encode and compress a payload
pub fn encode_payload(payload: &BackupPayload) -> StoreResult<String> {
    let json = serde_json::to_string(payload)?;
    Ok(compress(&json))
}

/// Decompress and parse a blob into a JSON object
pub fn decode_payload(data: &str) -> Option<Value> {
    let text = decompress(data)?;
    match serde_json::from_str::<Value>(&text) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => None,
        Err(e) => {
            warn!("[codec] decompressed payload is not JSON: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compress_round_trip() {
        let text = r#"{"fins_title":"Fins","fins_v2_items":[{"id":"1"}],"note":"héllo wörld"}"#;
        let blob = compress(text);
        assert_ne!(blob, text);
        assert_eq!(decompress(&blob).as_deref(), Some(text));
    }

    #[test]
    fn test_repetitive_payload_shrinks() {
        let text = "link-card ".repeat(500);
        let blob = compress(&text);
        assert!(blob.encode_utf16().count() < text.len() / 4);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode_payload(""), None);
        assert_eq!(decode_payload(&compress("not json")), None);
        assert_eq!(decode_payload(&compress("[1,2]")), None);
        assert_eq!(
            decode_payload(&compress(r#"{"version":"0.0.2"}"#)),
            Some(json!({ "version": "0.0.2" }))
        );
    }
}
