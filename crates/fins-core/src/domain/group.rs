//! Group Entity
//!
//! A named bucket of grid items shown as one dashboard page.

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// A dashboard group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Icon reference (remix icon class)
    #[serde(default)]
    pub icon: String,
    /// Default groups cannot be deleted
    #[serde(rename = "isDefault", default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            is_default: None,
        }
    }

    /// Mark this group as a default group
    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = Some(is_default);
        self
    }

    pub fn is_default(&self) -> bool {
        self.is_default.unwrap_or(false)
    }
}

impl Entity for Group {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for creating a group; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub icon: String,
}

/// First default group of a list, if any
pub fn default_group(groups: &[Group]) -> Option<&Group> {
    groups.iter().find(|g| g.is_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_group_wire_shape() {
        let group = Group::new("default_home", "Home", "ri-home-4-line").with_default(true);
        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(
            value,
            json!({ "id": "default_home", "name": "Home", "icon": "ri-home-4-line", "isDefault": true })
        );
    }

    #[test]
    fn test_missing_is_default_reads_as_false() {
        let group: Group =
            serde_json::from_value(json!({ "id": "g1", "name": "Misc", "icon": "ri-star-line" })).unwrap();
        assert!(!group.is_default());
        assert_eq!(group.is_default, None);
    }

    #[test]
    fn test_missing_name_and_icon_read_as_empty() {
        let group: Group = serde_json::from_value(json!({ "id": "g2" })).unwrap();
        assert_eq!(group.name, "");
        assert_eq!(group.icon, "");
        assert!(serde_json::from_value::<Group>(json!({ "name": "No id" })).is_err());
    }

    #[test]
    fn test_default_group_lookup() {
        let groups = vec![
            Group::new("a", "A", "i"),
            Group::new("b", "B", "i").with_default(true),
        ];
        assert_eq!(default_group(&groups).map(|g| g.id.as_str()), Some("b"));
        assert!(default_group(&groups[..1]).is_none());
    }
}
