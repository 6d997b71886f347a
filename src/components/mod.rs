//! UI Components
//!
//! Leptos components of the new-tab page.

mod confirm_dialog;
mod group_tabs;
mod item_grid;
mod search_bar;
mod settings_panel;
mod sync_panel;
mod toast_host;

pub use confirm_dialog::ConfirmDialog;
pub use group_tabs::GroupTabs;
pub use item_grid::ItemGrid;
pub use search_bar::SearchBar;
pub use settings_panel::SettingsPanel;
pub use sync_panel::SyncPanel;
pub use toast_host::ToastHost;
