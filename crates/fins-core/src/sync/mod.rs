//! Sync
//!
//! Backup payload codec and the cloud/file sync flows.

mod codec;
mod service;


pub use codec::{compress, decode_payload, decompress, encode_payload};
pub use service::{assemble_payload, SyncOutcome, SyncService};
