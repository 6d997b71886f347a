//! Item Grid Component
//!
//! Widgets of the active group, plus a quick form for new link cards.

use fins_core::domain::{GridItem, ItemSize, LinkCardProps, NewGridItem, Widget};
use leptos::prelude::*;
use serde_json::Value;

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

/// Two-letter badge for a link card without an icon
fn initials(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

/// Re-render a card when its size or props change
fn item_key(item: &GridItem) -> String {
    format!(
        "{}|{}|{}",
        item.id,
        item.size.as_str(),
        Value::Object(item.widget.props())
    )
}

fn render_widget(item: &GridItem) -> AnyView {
    match &item.widget {
        Widget::LinkCard(card) => {
            let name = card.name.clone().unwrap_or_default();
            let badge = match card.icon_type.as_deref() {
                Some("remix") => {
                    let class = card.icon_value.clone().unwrap_or_default();
                    view! { <i class=class></i> }.into_any()
                }
                _ => {
                    let text = card.icon_value.clone().unwrap_or_else(|| initials(&name));
                    view! { <span class="link-badge">{text}</span> }.into_any()
                }
            };
            let style = card
                .bg_color
                .as_ref()
                .map(|color| format!("background-color: {}", color))
                .unwrap_or_default();
            view! {
                <a class="link-card" href=card.url.clone().unwrap_or_default() style=style>
                    {badge}
                    <span class="link-name">{name}</span>
                </a>
            }
            .into_any()
        }
        widget => {
            let label = widget.label();
            let kind = widget.kind().to_string();
            view! {
                <div class="widget-placeholder" title=kind>
                    {label}
                </div>
            }
            .into_any()
        }
    }
}

#[component]
pub fn ItemGrid() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (new_name, set_new_name) = signal(String::new());
    let (new_url, set_new_url) = signal(String::new());

    let on_add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let url = new_url.get();
        if url.is_empty() {
            return;
        }
        let name = match new_name.get() {
            name if name.is_empty() => url.clone(),
            name => name,
        };
        let card = LinkCardProps {
            icon_type: Some("text".to_string()),
            icon_value: Some(initials(&name)),
            name: Some(name),
            url: Some(url),
            ..Default::default()
        };
        ctx.app()
            .grid
            .add_item(NewGridItem::new(Widget::LinkCard(card), ItemSize::OneByOne));
        ctx.reload();
        set_new_name.set(String::new());
        set_new_url.set(String::new());
    };

    let remove_item = move |id: &str| {
        ctx.app().grid.remove_item(id);
        ctx.reload();
    };

    // Swap with the previous item of the active group
    let move_earlier = move |id: &str| {
        let app = ctx.app();
        let mut items = app.grid.current_items();
        if let Some(index) = items.iter().position(|item| item.id == id) {
            if index > 0 {
                items.swap(index - 1, index);
                app.grid.reorder_current_items(items);
                ctx.reload();
            }
        }
    };

    view! {
        <section class="item-grid">
            <For
                each=move || store.current_items().get()
                key=|item| item_key(item)
                children=move |item| {
                    let class = format!("grid-item size-{}", item.size.as_str());
                    let remove_id = item.id.clone();
                    let move_id = item.id.clone();
                    view! {
                        <div class=class>
                            {render_widget(&item)}
                            <div class="grid-item-actions">
                                <button title="Move earlier" on:click=move |_| move_earlier(&move_id)>
                                    "‹"
                                </button>
                                <button title="Remove" on:click=move |_| remove_item(&remove_id)>
                                    "×"
                                </button>
                            </div>
                        </div>
                    }
                }
            />

            <form class="item-add-form" on:submit=on_add>
                <input
                    type="text"
                    placeholder="Name"
                    prop:value=move || new_name.get()
                    on:input=move |ev| set_new_name.set(event_target_value(&ev))
                />
                <input
                    type="url"
                    placeholder="https://"
                    prop:value=move || new_url.get()
                    on:input=move |ev| set_new_url.set(event_target_value(&ev))
                />
                <button type="submit">"Add"</button>
            </form>
        </section>
    }
}
