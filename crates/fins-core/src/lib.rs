//! Fins core
//!
//! Dashboard state for the Fins new-tab extension: domain types, the storage
//! facade, the stores and the backup/sync flows. Nothing here touches the
//! browser; the extension page supplies a [`KeyValueStorage`] and a
//! [`Scheduler`].

pub mod config;
pub mod domain;
pub mod repository;
pub mod store;
pub mod sync;

#[cfg(test)]
mod testing;

use std::rc::Rc;

pub use config::StoreConfig;
pub use domain::{StoreError, StoreResult};
pub use repository::{KeyValueStorage, MemoryStorage, StorageArea, StorageError};
pub use store::{
    ConfirmOptions, ConfirmStore, GridStore, Persister, Scheduler, SettingStore, ToastStore,
};
pub use sync::{SyncOutcome, SyncService};

/// Every store of one dashboard, wired to a shared storage backend
#[derive(Clone)]
pub struct Dashboard {
    pub grid: GridStore,
    pub settings: SettingStore,
    pub toast: ToastStore,
    pub confirm: ConfirmStore,
    pub sync: SyncService,
}

impl Dashboard {
    /// Build the stores. The returned persister must be driven (`run` or
    /// `flush`) for changes to reach storage.
    pub fn new(
        storage: Rc<dyn KeyValueStorage>,
        scheduler: Rc<dyn Scheduler>,
        config: StoreConfig,
    ) -> (Self, Persister) {
        let config = Rc::new(config);
        let (changes, receiver) = store::change_channel();

        let toast = ToastStore::with_duration(scheduler, config.toast_duration_ms);
        let confirm = ConfirmStore::new();
        let grid = GridStore::new(storage.clone(), config.clone(), changes.clone());
        let settings = SettingStore::new(storage.clone(), &config, toast.clone(), changes);
        let sync = SyncService::new(
            grid.clone(),
            settings.clone(),
            toast.clone(),
            confirm.clone(),
            storage.clone(),
            config.clone(),
        );
        let persister = Persister::new(receiver, grid.clone(), settings.clone(), storage, config);

        (
            Self {
                grid,
                settings,
                toast,
                confirm,
                sync,
            },
            persister,
        )
    }

    /// Load both stores from storage
    pub async fn init(&self) -> StoreResult<()> {
        self.grid.init().await?;
        self.settings.init().await
    }
}
