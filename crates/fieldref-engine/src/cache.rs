//! Locator cache and the static-override escape hatch.
//!
//! The cache memoizes the single winning selector per resolved field so the
//! second lookup in a scenario skips probing entirely. The override table is
//! consulted before any pattern computation; a hit bypasses the engine for
//! that field and is never mixed with cached pattern-derived values.

use fieldref_core::descriptor::FieldDescriptor;
use std::collections::HashMap;

/// Typed composite cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub pattern_set: String,
    pub element_type: String,
    /// Normalized descriptor rendering, so `" Username "` and `"Username"`
    /// share an entry.
    pub descriptor: String,
}

impl CacheKey {
    pub fn new(pattern_set: &str, element_type: &str, descriptor: &FieldDescriptor) -> Self {
        Self {
            pattern_set: pattern_set.to_string(),
            element_type: element_type.to_string(),
            descriptor: descriptor.to_string(),
        }
    }
}

/// Per-worker memo of resolved selectors. Cleared at scenario boundaries by
/// the test lifecycle hook.
#[derive(Debug, Default)]
pub struct LocatorCache {
    entries: HashMap<CacheKey, String>,
}

impl LocatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Store the single winning candidate, not the whole fallback list.
    pub fn store(&mut self, key: CacheKey, selector: String) {
        self.entries.insert(key, selector);
    }

    pub fn invalidate(&mut self, key: &CacheKey) {
        self.entries.remove(key);
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read-only table of literal selectors keyed by fully-qualified field name
/// (`pageName.elementType.fieldName`).
#[derive(Debug, Clone, Default)]
pub struct StaticOverrideTable {
    entries: HashMap<String, String>,
}

impl StaticOverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, selector: impl Into<String>) {
        self.entries.insert(key.into(), selector.into());
    }

    /// Look up an override, rejecting placeholder junk: empty values and
    /// values that merely echo the key back (the shape a "property not
    /// found" lookup returns in some config stores).
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty() && *v != key)
    }

    pub fn qualified_key(pattern_set: &str, element_type: &str, field_name: &str) -> String {
        format!("{pattern_set}.{element_type}.{field_name}")
    }
}
