//! Application Context
//!
//! Shared state provided via Leptos Context API.

use fins_core::Dashboard;
use leptos::prelude::*;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Dashboard stores (not `Send`, so kept in local storage)
    app: StoredValue<Dashboard, LocalStorage>,
    /// Bumped whenever dashboard state may have changed - read
    pub revision: ReadSignal<u32>,
    /// Bumped whenever dashboard state may have changed - write
    set_revision: WriteSignal<u32>,
}

impl AppContext {
    pub fn new(app: Dashboard, revision: (ReadSignal<u32>, WriteSignal<u32>)) -> Self {
        Self {
            app: StoredValue::new_local(app),
            revision: revision.0,
            set_revision: revision.1,
        }
    }

    /// Handle to the dashboard stores
    pub fn app(&self) -> Dashboard {
        self.app.get_value()
    }

    /// Re-read dashboard state into the view
    pub fn reload(&self) {
        self.set_revision.update(|v| *v = v.wrapping_add(1));
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
