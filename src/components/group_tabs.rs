//! Group Tab Bar Component
//!
//! Tab bar for switching between groups, adding and deleting them.

use fins_core::domain::{Group, NewGroup};
use fins_core::ConfirmOptions;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

/// Icon given to groups created from the tab bar
const NEW_GROUP_ICON: &str = "ri-folder-line";

#[component]
pub fn GroupTabs() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (adding, set_adding) = signal(false);
    let (new_name, set_new_name) = signal(String::new());

    let on_add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = new_name.get();
        if name.is_empty() {
            return;
        }
        ctx.app().grid.add_group(NewGroup {
            name,
            icon: NEW_GROUP_ICON.to_string(),
        });
        ctx.reload();
        set_new_name.set(String::new());
        set_adding.set(false);
    };

    let select_group = move |id: &str| {
        if let Err(e) = ctx.app().grid.set_current_group(id) {
            warn!("[GroupTabs] {}", e);
        }
        ctx.reload();
    };

    let remove_group = move |group: Group| {
        spawn_local(async move {
            let app = ctx.app();
            let options = ConfirmOptions::new(
                "Delete Group?",
                format!("Delete \"{}\" and all of its items?", group.name),
            )
            .confirm_text("Delete")
            .danger();
            if !app.confirm.show(options).await {
                return;
            }
            if let Err(e) = app.grid.remove_group(&group.id) {
                warn!("[GroupTabs] {}", e);
            }
            ctx.reload();
        });
    };

    view! {
        <nav class="group-tabs">
            <For
                each=move || store.groups().get()
                key=|group| group.id.clone()
                children=move |group| {
                    let id = group.id.clone();
                    let active_id = id.clone();
                    let tab_class = move || {
                        if store.current_group_id().get() == active_id {
                            "group-tab active"
                        } else {
                            "group-tab"
                        }
                    };
                    let delete_btn = (!group.is_default()).then(|| {
                        let target = group.clone();
                        view! {
                            <button
                                class="group-delete-btn"
                                title="Delete group"
                                on:click=move |ev| {
                                    ev.stop_propagation();
                                    remove_group(target.clone());
                                }
                            >
                                "×"
                            </button>
                        }
                    });

                    view! {
                        <div class="group-tab-wrap">
                            <button class=tab_class on:click=move |_| select_group(&id)>
                                <i class=group.icon.clone()></i>
                                <span>{group.name.clone()}</span>
                            </button>
                            {delete_btn}
                        </div>
                    }
                }
            />

            {move || if adding.get() {
                view! {
                    <form class="group-add-form" on:submit=on_add>
                        <input
                            type="text"
                            placeholder="Group name"
                            prop:value=move || new_name.get()
                            on:input=move |ev| set_new_name.set(event_target_value(&ev))
                        />
                        <button type="submit">"+"</button>
                        <button type="button" on:click=move |_| set_adding.set(false)>"×"</button>
                    </form>
                }.into_any()
            } else {
                view! {
                    <button class="group-add-btn" on:click=move |_| set_adding.set(true)>
                        "+"
                    </button>
                }.into_any()
            }}
        </nav>
    }
}
