//! # Named Registry
//!
//! DEF names seen during one conversion. The namespace is flat across the
//! whole document and a later DEF of the same name replaces the earlier
//! one.

use super::MeshRecord;
use crate::material::Material;
use crate::transform::TransformState;
use serde::Serialize;
use std::collections::HashMap;

/// What a DEF name refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Definition {
    /// A named Group or Transform with the records produced beneath it,
    /// already placed by the group's own transform.
    Group {
        transform: TransformState,
        records: Vec<MeshRecord>,
    },
    /// A named Shape, or a named geometry node inside one.
    Shape(MeshRecord),
    /// A named Material.
    Material(Material),
    /// A named Appearance, reduced to the material it carries.
    Appearance(Material),
}

impl Definition {
    /// Short name of the definition kind, for messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Group { .. } => "Group",
            Self::Shape(_) => "Shape",
            Self::Material(_) => "Material",
            Self::Appearance(_) => "Appearance",
        }
    }
}

/// Name to definition map scoped to one conversion.
///
/// # Example
///
/// ```rust
/// use vrml_mesh::{Definition, Material, NamedRegistry};
///
/// let mut registry = NamedRegistry::new();
/// registry.define("Red", Definition::Material(Material::default()));
/// assert_eq!(registry.material("Red"), Some(Material::default()));
/// assert_eq!(registry.material("Blue"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NamedRegistry {
    entries: HashMap<String, Definition>,
    /// Binding generation per name, bumped on every `define`
    #[serde(skip)]
    revisions: HashMap<String, u64>,
    #[serde(skip)]
    next_revision: u64,
}

impl NamedRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, returning the definition it replaced.
    pub fn define(&mut self, name: impl Into<String>, definition: Definition) -> Option<Definition> {
        let name = name.into();
        self.next_revision += 1;
        self.revisions.insert(name.clone(), self.next_revision);
        let previous = self.entries.insert(name.clone(), definition);
        if let Some(previous) = &previous {
            log::debug!(
                "DEF `{name}` redefined (was {}), last definition wins",
                previous.kind_name()
            );
        }
        previous
    }

    /// Binds `name` now and returns a token for filling it in later.
    ///
    /// A group's name is bound when the walk enters it, so a definition of
    /// the same name further down the tree replaces it.
    pub fn reserve(&mut self, name: impl Into<String>, definition: Definition) -> u64 {
        self.define(name, definition);
        self.next_revision
    }

    /// Stores the records of a reserved group.
    ///
    /// Returns false and leaves the registry untouched when `name` was
    /// redefined after [`reserve`](Self::reserve) handed out `revision`.
    pub fn complete_group(&mut self, name: &str, revision: u64, records: Vec<MeshRecord>) -> bool {
        if self.revisions.get(name) != Some(&revision) {
            return false;
        }
        match self.entries.get_mut(name) {
            Some(Definition::Group { records: slot, .. }) => {
                *slot = records;
                true
            }
            _ => false,
        }
    }

    /// Looks up a name.
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.entries.get(name)
    }

    /// Looks up a name that must refer to a material.
    pub fn material(&self, name: &str) -> Option<Material> {
        match self.entries.get(name) {
            Some(Definition::Material(material)) => Some(*material),
            _ => None,
        }
    }

    /// Looks up a name that must refer to an appearance.
    pub fn appearance(&self, name: &str) -> Option<Material> {
        match self.entries.get(name) {
            Some(Definition::Appearance(material)) => Some(*material),
            _ => None,
        }
    }

    /// Returns true if the name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the number of bound names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no name is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the bound names in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over all bindings in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Definition)> {
        self.entries.iter().map(|(name, def)| (name.as_str(), def))
    }
}
