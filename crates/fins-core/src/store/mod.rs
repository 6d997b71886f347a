//! Stores
//!
//! Shared, single-threaded state handles. Cloning a store clones the handle,
//! not the state.

mod confirm;
mod events;
mod grid;
mod persist;
mod settings;
mod toast;

#[cfg(test)]
mod tests;

pub use confirm::{ConfirmOptions, ConfirmStore};
pub use events::{change_channel, Change, ChangeReceiver, ChangeSender, Listeners};
pub use grid::{GridRestore, GridSnapshot, GridStore};
pub use persist::Persister;
pub use settings::SettingStore;
pub use toast::{Scheduler, Toast, ToastKind, ToastStore};

pub(crate) use grid::{parse_groups, parse_items};
