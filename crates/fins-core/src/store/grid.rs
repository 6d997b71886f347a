//! Grid Store
//!
//! Owns the dashboard items and their groups. Every mutation that changes a
//! value publishes a [`Change`]; persistence happens in the persister.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::events::{Change, ChangeSender};
use crate::config::StoreConfig;
use crate::domain::{
    default_group, generate_id, position_of, GridItem, GridItemPatch, Group, NewGridItem,
    NewGroup, StoreError, StoreResult, KEY_CURRENT_GROUP, KEY_GROUPS, KEY_ITEMS,
};
use crate::repository::{KeyValueStorage, StorageArea};

/// Deep copy of the grid, handed to the sync service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub groups: Vec<Group>,
    pub items: Vec<GridItem>,
    pub current_group_id: String,
}

/// Replacement state; absent fields are left alone
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridRestore {
    pub groups: Option<Vec<Group>>,
    pub items: Option<Vec<GridItem>>,
    pub current_group_id: Option<String>,
}

#[derive(Debug)]
struct GridState {
    items: Vec<GridItem>,
    groups: Vec<Group>,
    current_group_id: String,
    initialized: bool,
}

/// Shared handle to the grid
#[derive(Clone)]
pub struct GridStore {
    state: Rc<RefCell<GridState>>,
    storage: Rc<dyn KeyValueStorage>,
    config: Rc<StoreConfig>,
    changes: ChangeSender,
}

impl GridStore {
    pub fn new(storage: Rc<dyn KeyValueStorage>, config: Rc<StoreConfig>, changes: ChangeSender) -> Self {
        let state = GridState {
            items: Vec::new(),
            groups: Vec::new(),
            current_group_id: config.default_group_id(),
            initialized: false,
        };
        Self {
            state: Rc::new(RefCell::new(state)),
            storage,
            config,
            changes,
        }
    }

    // ========================
    // Loading
    // ========================

    /// Load persisted state, seeding defaults on first run. Idempotent.
    ///
    /// A failed read leaves the store uninitialized so the persister never
    /// overwrites data it could not see.
    pub async fn init(&self) -> StoreResult<()> {
        if self.is_initialized() {
            return Ok(());
        }

        let stored = self
            .storage
            .get(Some(&[KEY_GROUPS, KEY_ITEMS, KEY_CURRENT_GROUP][..]), StorageArea::Local)
            .await?;

        let loaded_groups = stored.get(KEY_GROUPS).and_then(parse_groups);
        let loaded_items = stored.get(KEY_ITEMS).and_then(parse_items);
        let seeded_groups = loaded_groups.is_none();
        let seeded_items = loaded_items.is_none();

        {
            let mut state = self.state.borrow_mut();
            state.groups = loaded_groups.unwrap_or_else(|| self.config.default_groups.clone());
            ensure_default_group(&mut state.groups);
            state.items = loaded_items.unwrap_or_else(|| self.config.default_items.clone());

            let fallback = fallback_group_id(&state.groups, &self.config);
            state.current_group_id = stored
                .get(KEY_CURRENT_GROUP)
                .and_then(Value::as_str)
                .filter(|id| position_of(&state.groups, id).is_some())
                .map(str::to_string)
                .unwrap_or(fallback);
            state.initialized = true;

            info!(
                "[GridStore] loaded {} groups, {} items, active '{}'",
                state.groups.len(),
                state.items.len(),
                state.current_group_id
            );
        }

        if seeded_groups {
            self.changes.publish(Change::Groups);
        }
        if seeded_items {
            self.changes.publish(Change::Items);
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    // ========================
    // Accessors
    // ========================

    pub fn items(&self) -> Vec<GridItem> {
        self.state.borrow().items.clone()
    }

    pub fn groups(&self) -> Vec<Group> {
        self.state.borrow().groups.clone()
    }

    pub fn current_group_id(&self) -> String {
        self.state.borrow().current_group_id.clone()
    }

    pub fn find_item(&self, id: &str) -> Option<GridItem> {
        self.state.borrow().items.iter().find(|i| i.id == id).cloned()
    }

    /// Items of the active group, in stored order
    pub fn current_items(&self) -> Vec<GridItem> {
        let state = self.state.borrow();
        state
            .items
            .iter()
            .filter(|item| item.group_id == state.current_group_id)
            .cloned()
            .collect()
    }

    // ========================
    // Groups
    // ========================

    /// Switch the active group
    pub fn set_current_group(&self, id: &str) -> StoreResult<()> {
        {
            let mut state = self.state.borrow_mut();
            if position_of(&state.groups, id).is_none() {
                return Err(StoreError::NotFound(format!("group '{}'", id)));
            }
            state.current_group_id = id.to_string();
        }
        self.changes.publish(Change::CurrentGroup);
        Ok(())
    }

    pub fn add_group(&self, group: NewGroup) -> String {
        let id = generate_id();
        self.state
            .borrow_mut()
            .groups
            .push(Group::new(id.clone(), group.name, group.icon));
        self.changes.publish(Change::Groups);
        id
    }

    /// Remove a non-default group and every item in it
    pub fn remove_group(&self, id: &str) -> StoreResult<()> {
        let (items_changed, active_changed) = {
            let mut state = self.state.borrow_mut();
            let index = position_of(&state.groups, id)
                .ok_or_else(|| StoreError::NotFound(format!("group '{}'", id)))?;
            if state.groups[index].is_default() {
                return Err(StoreError::Forbidden(format!(
                    "default group '{}' cannot be removed",
                    id
                )));
            }

            state.groups.remove(index);
            let before = state.items.len();
            state.items.retain(|item| item.group_id != id);
            let items_changed = state.items.len() != before;

            let active_changed = state.current_group_id == id;
            if active_changed {
                state.current_group_id = fallback_group_id(&state.groups, &self.config);
            }
            debug!(
                "[GridStore] removed group '{}' and {} items",
                id,
                before - state.items.len()
            );
            (items_changed, active_changed)
        };

        self.changes.publish(Change::Groups);
        if items_changed {
            self.changes.publish(Change::Items);
        }
        if active_changed {
            self.changes.publish(Change::CurrentGroup);
        }
        Ok(())
    }

    /// Replace the group list with a reordered one
    pub fn reorder_groups(&self, groups: Vec<Group>) -> StoreResult<()> {
        if default_group(&groups).is_none() {
            return Err(StoreError::InvalidInput(
                "group list must keep a default group".to_string(),
            ));
        }
        let changed = {
            let mut state = self.state.borrow_mut();
            let changed = state.groups != groups;
            state.groups = groups;
            changed
        };
        if changed {
            self.changes.publish(Change::Groups);
        }
        Ok(())
    }

    // ========================
    // Items
    // ========================

    /// Append an item to the active group
    pub fn add_item(&self, item: NewGridItem) -> String {
        let id = generate_id();
        {
            let mut state = self.state.borrow_mut();
            let group_id = state.current_group_id.clone();
            state.items.push(GridItem {
                id: id.clone(),
                group_id,
                size: item.size,
                widget: item.widget,
            });
        }
        self.changes.publish(Change::Items);
        id
    }

    /// Returns whether an item was removed
    pub fn remove_item(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.state.borrow_mut();
            match position_of(&state.items, id) {
                Some(index) => {
                    state.items.remove(index);
                    true
                }
                None => false,
            }
        };
        if removed {
            self.changes.publish(Change::Items);
        }
        removed
    }

    /// Merge a patch into an item. Returns whether the item changed.
    pub fn update_item(&self, id: &str, patch: &GridItemPatch) -> bool {
        let changed = {
            let mut state = self.state.borrow_mut();
            let Some(index) = position_of(&state.items, id) else {
                return false;
            };
            let updated = state.items[index].apply_patch(patch);
            if updated == state.items[index] {
                false
            } else {
                state.items[index] = updated;
                true
            }
        };
        if changed {
            self.changes.publish(Change::Items);
        }
        changed
    }

    /// Replace the active group's items with `sorted`, keeping the others
    pub fn reorder_current_items(&self, sorted: Vec<GridItem>) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let current = state.current_group_id.clone();
            let mut next: Vec<GridItem> = state
                .items
                .iter()
                .filter(|item| item.group_id != current)
                .cloned()
                .collect();
            next.extend(sorted);
            let changed = next != state.items;
            state.items = next;
            changed
        };
        if changed {
            self.changes.publish(Change::Items);
        }
    }

    // ========================
    // Sync interface
    // ========================

    pub fn snapshot(&self) -> GridSnapshot {
        let state = self.state.borrow();
        GridSnapshot {
            groups: state.groups.clone(),
            items: state.items.clone(),
            current_group_id: state.current_group_id.clone(),
        }
    }

    /// Replace grid state from a backup. The active group id is validated like
    /// [`GridStore::set_current_group`]; if it ends up pointing at a group that
    /// no longer exists the default group becomes active.
    pub fn restore(&self, restore: GridRestore) {
        if let Some(mut groups) = restore.groups {
            if groups.is_empty() {
                warn!("[GridStore] ignoring empty group list in backup");
            } else {
                ensure_default_group(&mut groups);
                self.state.borrow_mut().groups = groups;
                self.changes.publish(Change::Groups);
            }
        }

        if let Some(items) = restore.items {
            self.state.borrow_mut().items = items;
            self.changes.publish(Change::Items);
        }

        if let Some(id) = restore.current_group_id {
            if let Err(e) = self.set_current_group(&id) {
                warn!("[GridStore] backup active group ignored: {}", e);
            }
        }

        let fell_back = {
            let mut state = self.state.borrow_mut();
            if position_of(&state.groups, &state.current_group_id).is_none() {
                state.current_group_id = fallback_group_id(&state.groups, &self.config);
                true
            } else {
                false
            }
        };
        if fell_back {
            self.changes.publish(Change::CurrentGroup);
        }
    }
}

// ========================
// Helpers
// ========================

/// Parse a group list, dropping entries that are not groups. `None` when
/// nothing usable is left.
pub(crate) fn parse_groups(value: &Value) -> Option<Vec<Group>> {
    let entries = value.as_array()?;
    let groups: Vec<Group> = entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<Group>(entry.clone()) {
            Ok(group) => Some(group),
            Err(e) => {
                warn!("[GridStore] skipping malformed group: {}", e);
                None
            }
        })
        .collect();
    (!groups.is_empty()).then_some(groups)
}

/// Parse an item list, dropping entries that are not items
pub(crate) fn parse_items(value: &Value) -> Option<Vec<GridItem>> {
    let entries = value.as_array()?;
    let items: Vec<GridItem> = entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<GridItem>(entry.clone()) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("[GridStore] skipping malformed item: {}", e);
                None
            }
        })
        .collect();
    Some(items)
}

/// Promote the first group when none is marked default
fn ensure_default_group(groups: &mut [Group]) {
    if default_group(groups).is_some() {
        return;
    }
    if let Some(first) = groups.first_mut() {
        warn!("[GridStore] no default group, promoting '{}'", first.id);
        first.is_default = Some(true);
    }
}

fn fallback_group_id(groups: &[Group], config: &StoreConfig) -> String {
    default_group(groups)
        .map(|g| g.id.clone())
        .unwrap_or_else(|| config.default_group_id())
}
