//! Repository Layer
//!
//! Storage facade abstractions and implementations.

mod traits;
mod memory;

#[cfg(test)]
mod tests;

pub use traits::{single_item, KeyValueStorage, StorageArea, StorageError, StorageItems, StorageResult};
pub use memory::{measure_usage, MemoryStorage};
