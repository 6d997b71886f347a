//! Sync Panel Component
//!
//! Cloud sync toggle and quota meter, plus push, pull, clear, export and
//! import actions.

use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error};

use crate::commands::{download_file, read_selected_file};
use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

fn format_usage(bytes: u64, quota: u64, ratio: f64) -> String {
    format!(
        "{:.1} KB / {} KB ({:.0}%)",
        bytes as f64 / 1024.0,
        quota / 1024,
        ratio * 100.0
    )
}

#[component]
pub fn SyncPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (busy, set_busy) = signal(false);
    let file_input = NodeRef::<Input>::new();

    let on_toggle = move |ev: web_sys::Event| {
        let enabled = event_target_checked(&ev);
        spawn_local(async move {
            ctx.app().settings.set_sync_enabled(enabled).await;
            ctx.reload();
        });
    };

    let on_push = move |_| {
        set_busy.set(true);
        spawn_local(async move {
            let outcome = ctx.app().sync.push_to_cloud().await;
            debug!("[SyncPanel] push finished: {:?}", outcome);
            set_busy.set(false);
            ctx.reload();
        });
    };

    let on_pull = move |_| {
        set_busy.set(true);
        spawn_local(async move {
            let outcome = ctx.app().sync.pull_from_cloud().await;
            debug!("[SyncPanel] pull finished: {:?}", outcome);
            set_busy.set(false);
            ctx.reload();
        });
    };

    let on_clear = move |_| {
        set_busy.set(true);
        spawn_local(async move {
            let outcome = ctx.app().sync.clear_cloud_data().await;
            debug!("[SyncPanel] clear finished: {:?}", outcome);
            set_busy.set(false);
            ctx.reload();
        });
    };

    let on_export = move |_| {
        let app = ctx.app();
        let result = app
            .sync
            .export_file()
            .map_err(|e| e.to_string())
            .and_then(|file| download_file(&file));
        if let Err(e) = result {
            error!("[SyncPanel] export failed: {}", e);
            app.toast.error("Export failed.");
        }
        ctx.reload();
    };

    let on_import_pick = move |_| {
        if let Some(input) = file_input.get() {
            input.click();
        }
    };

    let on_import = move |_: web_sys::Event| {
        let Some(input) = file_input.get() else {
            return;
        };
        spawn_local(async move {
            let app = ctx.app();
            match read_selected_file(&input).await {
                Ok(Some(text)) => {
                    let outcome = app.sync.import_file(&text).await;
                    debug!("[SyncPanel] import finished: {:?}", outcome);
                }
                Ok(None) => {}
                Err(e) => {
                    error!("[SyncPanel] reading file failed: {}", e);
                    app.toast.error("Failed to read file.");
                }
            }
            ctx.reload();
        });
    };

    view! {
        <section class="sync-panel">
            <label class="sync-toggle">
                <input
                    type="checkbox"
                    prop:checked=move || store.sync_enabled().get()
                    on:change=on_toggle
                />
                <span>"Cloud sync"</span>
            </label>

            {move || store.sync_enabled().get().then(|| {
                let usage = store.sync_usage().get();
                let quota = store.sync_quota().get();
                let ratio = store.sync_usage_ratio().get();
                view! {
                    <div class="sync-usage">
                        <progress max=quota.to_string() value=usage.to_string()></progress>
                        <span>{format_usage(usage, quota, ratio)}</span>
                    </div>
                }
            })}

            <div class="sync-actions">
                <button disabled=move || busy.get() on:click=on_push>
                    <i class="ri-upload-cloud-line"></i>
                    " Upload"
                </button>
                <button disabled=move || busy.get() on:click=on_pull>
                    <i class="ri-download-cloud-line"></i>
                    " Download"
                </button>
                <button class="danger" disabled=move || busy.get() on:click=on_clear>
                    <i class="ri-delete-bin-line"></i>
                    " Clear cloud"
                </button>
            </div>

            <div class="backup-actions">
                <button on:click=on_export>
                    <i class="ri-file-download-line"></i>
                    " Export"
                </button>
                <button on:click=on_import_pick>
                    <i class="ri-file-upload-line"></i>
                    " Import"
                </button>
                <input
                    type="file"
                    accept=".json,application/json"
                    style="display: none"
                    node_ref=file_input
                    on:change=on_import
                />
            </div>
        </section>
    }
}
