//! Permission names and permission sets.
//!
//! On the wire a permission set is a JSON object mapping each granted
//! permission name to the empty-object "allowed" marker, e.g.
//! `{"view": {}, "upload": {}}`. In memory it is a set of [`Permission`]
//! keys, so intersection is a plain set operation.

use std::collections::BTreeSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A named capability on a target group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    /// Full control of one's own account.
    Root,
    /// Control of a custodial account on behalf of its owner.
    Custodian,
    /// Read access to the group's data.
    View,
    /// Write access to the group's data.
    Upload,
    /// Permission to annotate the group's data.
    Note,
    /// Any other permission name issued by the permission graph.
    Other(String),
}

impl Permission {
    /// The wire name of this permission.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Root => "root",
            Self::Custodian => "custodian",
            Self::View => "view",
            Self::Upload => "upload",
            Self::Note => "note",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Permission {
    fn from(name: &str) -> Self {
        match name {
            "root" => Self::Root,
            "custodian" => Self::Custodian,
            "view" => Self::View,
            "upload" => Self::Upload,
            "note" => Self::Note,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of granted permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a permission; returns `true` if it was not already present.
    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    /// Whether the permission is granted.
    pub fn contains(&self, permission: &Permission) -> bool {
        self.0.contains(permission)
    }

    /// Permissions present in both sets.
    pub fn intersection(&self, other: &PermissionSet) -> PermissionSet {
        PermissionSet(self.0.intersection(&other.0).cloned().collect())
    }

    /// This set with one permission removed.
    pub fn without(&self, permission: &Permission) -> PermissionSet {
        PermissionSet(self.0.iter().filter(|p| *p != permission).cloned().collect())
    }

    /// Whether no permission is granted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of granted permissions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over granted permissions in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Permission; N]> for PermissionSet {
    fn from(permissions: [Permission; N]) -> Self {
        permissions.into_iter().collect()
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let marker = serde_json::Map::new();
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for permission in &self.0 {
            map.serialize_entry(permission.as_str(), &marker)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = PermissionSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of permission names to allowed markers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut set = PermissionSet::new();
                while let Some((name, value)) =
                    access.next_entry::<String, serde_json::Value>()?
                {
                    // Only the empty-object marker means "granted".
                    if value.as_object().is_some_and(|o| o.is_empty()) {
                        set.insert(Permission::from(name.as_str()));
                    }
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(SetVisitor)
    }
}
