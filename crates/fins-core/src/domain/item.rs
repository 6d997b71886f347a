//! Grid Item Entity
//!
//! One widget placement on the dashboard. The wire format keeps the open
//! `{ id, groupId, type, size, props }` shape; in memory the `type`/`props`
//! pair is a typed [`Widget`] with an opaque fallback for unknown kinds.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::entity::Entity;

/// Open props bag as stored on the wire
pub type Props = Map<String, Value>;

/// Grid cell footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ItemSize {
    #[default]
    #[serde(rename = "1x1")]
    OneByOne,
    #[serde(rename = "2x1")]
    TwoByOne,
    #[serde(rename = "2x2")]
    TwoByTwo,
    #[serde(rename = "4x2")]
    FourByTwo,
}

impl ItemSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemSize::OneByOne => "1x1",
            ItemSize::TwoByOne => "2x1",
            ItemSize::TwoByTwo => "2x2",
            ItemSize::FourByTwo => "4x2",
        }
    }
}

/// Props of a `link-card` widget
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCardProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// `remix`, `text` or `image`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    /// Props this version does not know about, kept verbatim
    #[serde(flatten)]
    pub extra: Props,
}

/// Props of a `clock-card` widget
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClockProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(flatten)]
    pub extra: Props,
}

/// Widget kind together with its props
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    LinkCard(LinkCardProps),
    Clock(ClockProps),
    /// Any kind this version cannot type, or typed kinds whose props do not fit
    Unknown { kind: String, props: Props },
}

impl Widget {
    pub const LINK_CARD: &'static str = "link-card";
    pub const CLOCK: &'static str = "clock-card";

    /// Build a widget from its wire parts.
    ///
    /// A typed variant is only chosen when it reproduces `props` exactly,
    /// so reading and writing an item never alters its stored JSON.
    pub fn from_parts(kind: &str, props: Props) -> Self {
        let typed = match kind {
            Self::LINK_CARD => serde_json::from_value::<LinkCardProps>(Value::Object(props.clone()))
                .ok()
                .map(Widget::LinkCard),
            Self::CLOCK => serde_json::from_value::<ClockProps>(Value::Object(props.clone()))
                .ok()
                .map(Widget::Clock),
            _ => None,
        };

        match typed {
            Some(widget) if widget.props() == props => widget,
            _ => Widget::Unknown {
                kind: kind.to_string(),
                props,
            },
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Widget::LinkCard(_) => Self::LINK_CARD,
            Widget::Clock(_) => Self::CLOCK,
            Widget::Unknown { kind, .. } => kind,
        }
    }

    /// Props in wire form
    pub fn props(&self) -> Props {
        match self {
            Widget::LinkCard(props) => to_props(props),
            Widget::Clock(props) => to_props(props),
            Widget::Unknown { props, .. } => props.clone(),
        }
    }

    /// Display label used by the dashboard (link name, timezone or kind)
    pub fn label(&self) -> String {
        match self {
            Widget::LinkCard(props) => props.name.clone().unwrap_or_default(),
            Widget::Clock(props) => props.timezone.clone().unwrap_or_else(|| "Local".to_string()),
            Widget::Unknown { kind, .. } => kind.clone(),
        }
    }
}

fn to_props<T: Serialize>(value: &T) -> Props {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Props::new(),
    }
}

/// Wire representation of a grid item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGridItem {
    id: String,
    group_id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: ItemSize,
    #[serde(default)]
    props: Props,
}

/// A widget placed on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGridItem", into = "RawGridItem")]
pub struct GridItem {
    /// Unique identifier
    pub id: String,
    /// Owning group
    pub group_id: String,
    pub size: ItemSize,
    pub widget: Widget,
}

impl From<RawGridItem> for GridItem {
    fn from(raw: RawGridItem) -> Self {
        Self {
            widget: Widget::from_parts(&raw.kind, raw.props),
            id: raw.id,
            group_id: raw.group_id,
            size: raw.size,
        }
    }
}

impl From<GridItem> for RawGridItem {
    fn from(item: GridItem) -> Self {
        Self {
            kind: item.widget.kind().to_string(),
            props: item.widget.props(),
            id: item.id,
            group_id: item.group_id,
            size: item.size,
        }
    }
}

impl GridItem {
    /// Apply a partial update.
    ///
    /// Top-level fields are replaced when present; props are merged key by key
    /// so props missing from the patch survive.
    pub fn apply_patch(&self, patch: &GridItemPatch) -> GridItem {
        let mut props = self.widget.props();
        if let Some(patch_props) = &patch.props {
            for (key, value) in patch_props {
                props.insert(key.clone(), value.clone());
            }
        }
        let kind = patch.kind.as_deref().unwrap_or_else(|| self.widget.kind());

        GridItem {
            id: self.id.clone(),
            group_id: patch.group_id.clone().unwrap_or_else(|| self.group_id.clone()),
            size: patch.size.unwrap_or(self.size),
            widget: Widget::from_parts(kind, props),
        }
    }
}

impl Entity for GridItem {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for `add_item`; id and group are assigned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewGridItem {
    pub widget: Widget,
    pub size: ItemSize,
}

impl NewGridItem {
    pub fn new(widget: Widget, size: ItemSize) -> Self {
        Self { widget, size }
    }
}

/// Partial update for `update_item`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridItemPatch {
    pub group_id: Option<String>,
    pub kind: Option<String>,
    pub size: Option<ItemSize>,
    pub props: Option<Props>,
}

impl GridItemPatch {
    /// Patch touching only props
    pub fn props(props: Props) -> Self {
        Self {
            props: Some(props),
            ..Default::default()
        }
    }

    pub fn size(size: ItemSize) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }
}

/// Fresh item/group id: epoch milliseconds followed by a short random suffix
pub fn generate_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", chrono::Utc::now().timestamp_millis(), &suffix[..4])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Props {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_link_card_is_typed() {
        let item: GridItem = serde_json::from_value(json!({
            "id": "1",
            "groupId": "default_home",
            "type": "link-card",
            "size": "1x1",
            "props": { "name": "GitHub", "url": "https://github.com", "iconType": "remix" }
        }))
        .unwrap();

        match &item.widget {
            Widget::LinkCard(p) => {
                assert_eq!(p.name.as_deref(), Some("GitHub"));
                assert_eq!(p.icon_type.as_deref(), Some("remix"));
            }
            other => panic!("expected link card, got {:?}", other),
        }
        assert_eq!(item.size, ItemSize::OneByOne);
    }

    #[test]
    fn test_unknown_kind_round_trips_verbatim() {
        let wire = json!({
            "id": "w1",
            "groupId": "g",
            "type": "weather-card",
            "size": "2x2",
            "props": { "city": "Oslo", "units": { "temp": "C" } }
        });
        let item: GridItem = serde_json::from_value(wire.clone()).unwrap();
        assert!(matches!(item.widget, Widget::Unknown { ref kind, .. } if kind == "weather-card"));
        assert_eq!(serde_json::to_value(&item).unwrap(), wire);
    }

    #[test]
    fn test_ill_shaped_link_card_falls_back_to_unknown() {
        let wire = json!({
            "id": "x",
            "groupId": "g",
            "type": "link-card",
            "size": "1x1",
            "props": { "name": 42, "url": null }
        });
        let item: GridItem = serde_json::from_value(wire.clone()).unwrap();
        assert!(matches!(item.widget, Widget::Unknown { .. }));
        assert_eq!(serde_json::to_value(&item).unwrap(), wire);
    }

    #[test]
    fn test_patch_merges_props() {
        let item = GridItem {
            id: "1".into(),
            group_id: "g".into(),
            size: ItemSize::OneByOne,
            widget: Widget::from_parts("link-card", props(json!({ "y": 2, "name": "Old" }))),
        };

        let patched = item.apply_patch(&GridItemPatch::props(props(json!({ "x": 1, "name": "New" }))));

        assert_eq!(patched.widget.props(), props(json!({ "x": 1, "y": 2, "name": "New" })));
        assert_eq!(patched.id, "1");
        assert_eq!(patched.group_id, "g");
        assert_eq!(patched.size, ItemSize::OneByOne);
    }

    #[test]
    fn test_patch_top_level_fields() {
        let item = GridItem {
            id: "1".into(),
            group_id: "g".into(),
            size: ItemSize::OneByOne,
            widget: Widget::from_parts("clock-card", props(json!({ "timezone": "UTC" }))),
        };

        let patched = item.apply_patch(&GridItemPatch::size(ItemSize::FourByTwo));
        assert_eq!(patched.size, ItemSize::FourByTwo);
        assert_eq!(patched.widget, item.widget);
    }

    #[test]
    fn test_generate_id_is_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert!(a.len() > 4);
    }
}
