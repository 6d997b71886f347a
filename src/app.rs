//! Fins Frontend App
//!
//! Wires the dashboard stores to the extension host and lays out the page.

use std::rc::Rc;

use fins_core::domain::BgMode;
use fins_core::repository::{KeyValueStorage, MemoryStorage};
use fins_core::{Dashboard, StoreConfig};
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info, warn};
use reactive_stores::Store;

use crate::commands::{ChromeStorage, TimeoutScheduler};
use crate::components::{
    ConfirmDialog, GroupTabs, ItemGrid, SearchBar, SettingsPanel, SyncPanel, ToastHost,
};
use crate::context::AppContext;
use crate::store::{store_refresh, AppState, AppStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let (revision, set_revision) = signal(0u32);

    let config = StoreConfig::default();
    let storage: Rc<dyn KeyValueStorage> = if ChromeStorage::available() {
        Rc::new(ChromeStorage::new(config.sync_quota))
    } else {
        warn!("[APP] extension storage unavailable, changes will not survive a reload");
        Rc::new(MemoryStorage::for_config(&config))
    };
    let (app, persister) = Dashboard::new(storage, Rc::new(TimeoutScheduler), config);

    // Toasts expire and dialogs open outside of any click handler
    let bump = move || set_revision.update(|v| *v = v.wrapping_add(1));
    app.toast.on_change(bump);
    app.confirm.on_change(bump);

    let ctx = AppContext::new(app.clone(), (revision, set_revision));
    let store = Store::new(AppState::default());
    provide_context(ctx);
    provide_context(store);

    spawn_local(persister.run());
    spawn_local(async move {
        match app.init().await {
            Ok(()) => info!("[APP] dashboard loaded"),
            Err(e) => error!("[APP] failed to load dashboard: {}", e),
        }
        ctx.reload();
    });

    // Pull dashboard state into the view store
    Effect::new(move |_| {
        let _ = revision.get();
        store_refresh(&store, &ctx.app());
    });

    Effect::new(move |_| {
        let title = store.title().get();
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            document.set_title(&title);
        }
    });

    let background = move || match store.bg_mode().get() {
        BgMode::Custom => {
            let url = store.custom_bg_url().get();
            if url.is_empty() {
                String::new()
            } else {
                format!("background-image: url('{}')", url)
            }
        }
        BgMode::Bing => String::new(),
    };

    view! {
        <div class="fins-app" style=background>
            <header class="fins-header">
                <h1>{move || store.title().get()}</h1>
            </header>

            <SearchBar />

            <main class="fins-main">
                <GroupTabs />
                <ItemGrid />
            </main>

            <aside class="fins-side">
                <SettingsPanel />
                <SyncPanel />
            </aside>

            <ConfirmDialog />
            <ToastHost />
        </div>
    }
}
