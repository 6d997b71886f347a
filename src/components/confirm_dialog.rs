//! Confirm Dialog Component
//!
//! Modal for the head of the confirm queue.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn ConfirmDialog() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    move || {
        store.confirm().get().map(|options| {
            let confirm_class = if options.is_danger {
                "confirm-btn danger"
            } else {
                "confirm-btn"
            };
            view! {
                <div class="confirm-overlay">
                    <div class="confirm-dialog" role="dialog">
                        <h3 class="confirm-title">{options.title}</h3>
                        <p class="confirm-content">{options.content}</p>
                        <div class="confirm-actions">
                            <button
                                class="cancel-btn"
                                on:click=move |_| ctx.app().confirm.handle_cancel()
                            >
                                {options.cancel_text}
                            </button>
                            <button
                                class=confirm_class
                                on:click=move |_| ctx.app().confirm.handle_confirm()
                            >
                                {options.confirm_text}
                            </button>
                        </div>
                    </div>
                </div>
            }
        })
    }
}
