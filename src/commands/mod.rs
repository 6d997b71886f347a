//! Host Bindings
//!
//! Browser capabilities the dashboard stores run on, organized by concern.

mod files;
mod storage;
mod timer;

// Re-export all public items
pub use files::*;
pub use storage::*;
pub use timer::*;
