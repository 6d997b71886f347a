//! Search Bar Component
//!
//! Engine picker and query box; submitting navigates to the engine's results.

use leptos::prelude::*;
use log::{error, warn};

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn SearchBar() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (query, set_query) = signal(String::new());

    let on_select = move |ev: web_sys::Event| {
        let Ok(index) = event_target_value(&ev).parse::<usize>() else {
            return;
        };
        if let Err(e) = ctx.app().settings.set_current_engine(index) {
            warn!("[SearchBar] {}", e);
        }
        ctx.reload();
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = query.get();
        if text.trim().is_empty() {
            return;
        }
        let Some(url) = ctx.app().settings.search_url(&text) else {
            warn!("[SearchBar] no search engine configured");
            return;
        };
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(&url) {
                error!("[SearchBar] navigation failed: {:?}", e);
            }
        }
    };

    let placeholder = move || {
        let engines = store.search_engines().get();
        let index = store.current_engine_index().get();
        engines
            .get(index)
            .or_else(|| engines.first())
            .map(|engine| format!("Search with {}", engine.name))
            .unwrap_or_default()
    };

    view! {
        <form class="search-bar" on:submit=on_submit>
            <select
                class="engine-select"
                prop:value=move || store.current_engine_index().get().to_string()
                on:change=on_select
            >
                {move || {
                    store
                        .search_engines()
                        .get()
                        .into_iter()
                        .enumerate()
                        .map(|(index, engine)| {
                            view! { <option value=index.to_string()>{engine.name}</option> }
                        })
                        .collect_view()
                }}
            </select>
            <input
                type="text"
                class="search-input"
                autofocus=true
                placeholder=placeholder
                prop:value=move || query.get()
                on:input=move |ev| set_query.set(event_target_value(&ev))
            />
            <button type="submit" class="search-btn">
                <i class="ri-search-line"></i>
            </button>
        </form>
    }
}
