//! Domain Layer
//!
//! Dashboard entities and the backup payload shape.
//! This layer has no storage or UI dependencies.

mod entity;
mod group;
mod item;
mod settings;
mod backup;

pub use entity::{position_of, Entity, StoreError, StoreResult};
pub use group::{default_group, Group, NewGroup};
pub use item::{
    generate_id, ClockProps, GridItem, GridItemPatch, ItemSize, LinkCardProps, NewGridItem, Props,
    Widget,
};
pub use settings::{BgMode, SearchEngine, Settings, DEFAULT_TITLE, SYNC_QUOTA_BYTES};
pub use backup::*;
