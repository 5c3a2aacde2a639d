//! Structure catalog
//!
//! The catalog maps every declared structure's [`StructKey`] to its
//! definition. It is filled by one collection pass over all source files
//! through a [`CatalogBuilder`] and then frozen into a read-only [`Catalog`];
//! resolution never adds to it.

use crate::models::{StructDefinition, StructKey};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Mutable catalog used during collection
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    entries: IndexMap<StructKey, StructDefinition>,
}

impl CatalogBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition, replacing an earlier one under the same key.
    ///
    /// Returns the replaced definition so callers can report the duplicate.
    pub fn register(
        &mut self,
        key: StructKey,
        definition: StructDefinition,
    ) -> Option<StructDefinition> {
        tracing::debug!(key = %key, fields = definition.fields.len(), "registering structure");
        // Keep the first insertion position so iteration order stays stable.
        self.entries.insert(key, definition)
    }

    /// Number of registered structures
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze into a read-only catalog
    pub fn build(self) -> Catalog {
        let mut by_name: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for key in self.entries.keys() {
            by_name
                .entry(key.name.clone())
                .or_default()
                .push(key.package.clone());
        }
        for packages in by_name.values_mut() {
            packages.sort();
        }
        Catalog {
            entries: self.entries,
            by_name,
        }
    }
}

/// Read-only structure catalog
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    entries: IndexMap<StructKey, StructDefinition>,
    /// Bare name → declaring packages, sorted
    by_name: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    /// Look up a structure by exact key
    pub fn lookup(&self, key: &StructKey) -> Option<&StructDefinition> {
        self.entries.get(key)
    }

    /// Check whether a key is declared
    pub fn contains(&self, key: &StructKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Packages declaring a structure with this bare name, in sorted order
    pub fn packages_declaring(&self, name: &str) -> &[String] {
        self.by_name.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Iterate over all entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&StructKey, &StructDefinition)> {
        self.entries.iter()
    }

    /// Get the number of structures
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(StructKey, StructDefinition)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (StructKey, StructDefinition)>>(iter: I) -> Self {
        let mut builder = CatalogBuilder::new();
        for (key, def) in iter {
            builder.register(key, def);
        }
        builder.build()
    }
}
