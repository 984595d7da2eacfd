//! The symbol catalog.
//!
//! A [`CategoryRegistry`] is an ordered, immutable list of
//! [`SymbolCategory`] values. Position in the list is the category id and
//! also the drawer dispatch order, so construction checks that ids are
//! contiguous from zero and that keys are unique.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::ConfigurationError;

// ============================================================================
// SymbolCategory
// ============================================================================

/// One kind of map symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolCategory {
    /// Position in the registry, `0..len`.
    pub id: usize,

    /// Unique slug used to name output folders.
    pub key: String,

    /// Human readable name, display only.
    pub label: String,
}

impl SymbolCategory {
    pub fn new(id: usize, key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            label: label.into(),
        }
    }
}

// ============================================================================
// Built-in catalog
// ============================================================================

/// `(key, label)` pairs of the built-in catalog, in id order.
///
/// The last four entries have no design yet and render as blank icons.
const BUILTIN_CATEGORIES: &[(&str, &str)] = &[
    ("town", "Town"),
    ("crossroads", "Crossroads"),
    ("hospital", "Hospital"),
    ("fort", "Fort"),
    ("chapel", "Chapel"),
    ("windmill", "Windmill"),
    ("lighthouse", "Lighthouse"),
    ("castle", "Castle"),
    ("mine", "Mine"),
    ("ruins", "Ruins"),
    ("cave", "Cave"),
    ("well", "Well"),
];

// ============================================================================
// CategoryRegistry
// ============================================================================

/// Ordered, read-only catalog of symbol categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    categories: Vec<SymbolCategory>,
}

impl CategoryRegistry {
    /// Builds a registry, checking the catalog invariants.
    ///
    /// Fails when the list is empty, when ids are not `0..len` in order, or
    /// when a key is empty or repeated.
    pub fn new(categories: Vec<SymbolCategory>) -> Result<Self, ConfigurationError> {
        if categories.is_empty() {
            return Err(ConfigurationError::EmptyRegistry);
        }

        let mut seen = HashSet::with_capacity(categories.len());
        for (position, category) in categories.iter().enumerate() {
            if category.id != position {
                return Err(ConfigurationError::NonContiguousId {
                    position,
                    id: category.id,
                });
            }
            if category.key.is_empty() {
                return Err(ConfigurationError::EmptyKey { position });
            }
            if !seen.insert(category.key.as_str()) {
                return Err(ConfigurationError::DuplicateKey(category.key.clone()));
            }
        }

        Ok(Self { categories })
    }

    /// Returns the built-in twelve-category catalog.
    pub fn builtin() -> Self {
        let categories = BUILTIN_CATEGORIES
            .iter()
            .enumerate()
            .map(|(id, (key, label))| SymbolCategory::new(id, *key, *label))
            .collect();
        Self { categories }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&SymbolCategory> {
        self.categories.get(id)
    }

    pub fn by_key(&self, key: &str) -> Option<&SymbolCategory> {
        self.categories.iter().find(|c| c.key == key)
    }

    pub fn contains(&self, id: usize) -> bool {
        id < self.categories.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolCategory> {
        self.categories.iter()
    }
}

impl<'a> IntoIterator for &'a CategoryRegistry {
    type Item = &'a SymbolCategory;
    type IntoIter = std::slice::Iter<'a, SymbolCategory>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}
