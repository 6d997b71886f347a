//! Toast Host Component
//!
//! Stacked notifications; click to dismiss early.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn ToastHost() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    view! {
        <div class="toast-host">
            <For
                each=move || store.toasts().get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = format!("toast toast-{}", toast.kind.as_str());
                    view! {
                        <div class=class on:click=move |_| ctx.app().toast.remove(id)>
                            {toast.message.clone()}
                        </div>
                    }
                }
            />
        </div>
    }
}
