use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid group configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which way the tree grows from its root.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    #[default]
    Right,
    Up,
    Down,
}

/// A `null` value reads as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Only an explicit `false` turns even distribution off.
fn null_as_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    #[serde(deserialize_with = "null_as_default")]
    pub direction: Direction,
    /// Reserved for the separation policy; carried but not consulted.
    #[serde(deserialize_with = "null_as_true")]
    pub even_distribution: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_order: Option<Vec<String>>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self { direction: Direction::Right, even_distribution: true, group_order: None }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    /// Member names in display order. `None` means the group lists nobody.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,
}

/// Group definitions in the order they were declared.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Groups(Vec<(String, Group)>);

impl Groups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a group. A replaced group keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, group: Group) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = group,
            None => self.0.push((name, group)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Group> {
        self.0.iter().find(|(existing, _)| existing == name).map(|(_, group)| group)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Group)> for Groups {
    fn from_iter<I: IntoIterator<Item = (S, Group)>>(iter: I) -> Self {
        let mut groups = Groups::new();
        for (name, group) in iter {
            groups.insert(name, group);
        }
        groups
    }
}

impl Serialize for Groups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, group) in &self.0 {
            map.serialize_entry(name, group)?;
        }
        map.end()
    }
}

struct GroupsVisitor;

impl<'de> Visitor<'de> for GroupsVisitor {
    type Value = Groups;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of group names to group definitions")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut groups = Groups::new();
        while let Some((name, group)) = access.next_entry::<String, Option<Group>>()? {
            groups.insert(name, group.unwrap_or_default());
        }
        Ok(groups)
    }
}

impl<'de> Deserialize<'de> for Groups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(GroupsVisitor)
    }
}

/// Grouping configuration: which leaf belongs to which group, in which order
/// groups are shown, and how the tree is drawn.
///
/// Every section may be omitted; omitted sections take their defaults.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub layout: LayoutOptions,
    #[serde(deserialize_with = "null_as_default")]
    pub groups: Groups,
}

impl GroupConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// `layout.groupOrder` when given, otherwise the declaration order of
    /// `groups`.
    pub fn group_order(&self) -> Vec<String> {
        match &self.layout.group_order {
            Some(order) => order.clone(),
            None => self.groups.names().map(str::to_string).collect(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.layout.direction
    }
}

/// Pixel bounds for branch lengths derived from confidence values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchLengthConfig {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl Default for BranchLengthConfig {
    fn default() -> Self {
        Self { min: 30.0, max: 200.0, default: 100.0 }
    }
}

impl BranchLengthConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Linear map of `[0, 1]` onto `[min, max]`, unclamped.
    pub fn scale(&self, confidence: f64) -> f64 {
        self.min + confidence * (self.max - self.min)
    }

    /// Falls back to `default` when there is no confidence or when scaling
    /// it overflows.
    pub fn length_for(&self, confidence: Option<f64>) -> f64 {
        match confidence.map(|confidence| self.scale(confidence)) {
            Some(length) if length.is_finite() => length,
            _ => self.default,
        }
    }
}
