//! Settings Panel Component
//!
//! Page title, background and the search engine list.

use fins_core::domain::{BgMode, SearchEngine};
use leptos::prelude::*;
use log::warn;

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

/// Icon given to engines added from the panel
const NEW_ENGINE_ICON: &str = "ri-search-line";

#[component]
pub fn SettingsPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (engine_name, set_engine_name) = signal(String::new());
    let (engine_url, set_engine_url) = signal(String::new());

    let on_title = move |ev: web_sys::Event| {
        ctx.app().settings.set_title(&event_target_value(&ev));
        ctx.reload();
    };

    let on_bg_mode = move |ev: web_sys::Event| {
        if let Some(mode) = BgMode::parse(&event_target_value(&ev)) {
            ctx.app().settings.set_bg_mode(mode);
            ctx.reload();
        }
    };

    let on_bg_url = move |ev: web_sys::Event| {
        ctx.app().settings.set_custom_bg_url(&event_target_value(&ev));
        ctx.reload();
    };

    let remove_engine = move |index: usize| {
        if let Err(e) = ctx.app().settings.remove_engine(index) {
            warn!("[SettingsPanel] {}", e);
        }
        ctx.reload();
    };

    let on_add_engine = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = engine_name.get();
        let url = engine_url.get();
        if name.is_empty() || url.is_empty() {
            return;
        }
        ctx.app()
            .settings
            .add_engine(SearchEngine::new(name, NEW_ENGINE_ICON, url));
        ctx.reload();
        set_engine_name.set(String::new());
        set_engine_url.set(String::new());
    };

    view! {
        <details class="settings-panel">
            <summary>"Settings"</summary>

            <label>
                "Title"
                <input type="text" prop:value=move || store.title().get() on:change=on_title />
            </label>

            <label>
                "Background"
                <select
                    prop:value=move || store.bg_mode().get().as_str().to_string()
                    on:change=on_bg_mode
                >
                    <option value=BgMode::Bing.as_str()>"Bing"</option>
                    <option value=BgMode::Custom.as_str()>"Custom"</option>
                </select>
            </label>

            {move || (store.bg_mode().get() == BgMode::Custom).then(|| view! {
                <label>
                    "Image URL"
                    <input
                        type="url"
                        prop:value=move || store.custom_bg_url().get()
                        on:change=on_bg_url
                    />
                </label>
            })}

            <ul class="engine-list">
                {move || {
                    store
                        .search_engines()
                        .get()
                        .into_iter()
                        .enumerate()
                        .map(|(index, engine)| {
                            view! {
                                <li>
                                    <i class=engine.icon></i>
                                    <span>{engine.name}</span>
                                    <button title="Remove" on:click=move |_| remove_engine(index)>
                                        "×"
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>

            <form class="engine-add-form" on:submit=on_add_engine>
                <input
                    type="text"
                    placeholder="Engine name"
                    prop:value=move || engine_name.get()
                    on:input=move |ev| set_engine_name.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="https://example.com/search?q="
                    prop:value=move || engine_url.get()
                    on:input=move |ev| set_engine_url.set(event_target_value(&ev))
                />
                <button type="submit">"Add"</button>
            </form>
        </details>
    }
}
