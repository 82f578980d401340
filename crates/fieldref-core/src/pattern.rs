//! Pattern sets: named bundles of selector templates for one page/component.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Element types that get label indirection by default. A pattern set can
/// extend this list via `label_eligible`.
pub const LABEL_ELIGIBLE_TYPES: &[&str] = &["input", "select", "textarea"];

/// Template key reserved for the label-indirection lookup.
pub const LABEL_TEMPLATE_KEY: &str = "label";

/// Static misconfiguration. Never retried: a broken pattern set cannot fix
/// itself between probing passes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("pattern set '{0}' is not registered")]
    UnknownPatternSet(String),

    #[error("pattern set '{set}' has no field template for element type '{key}'")]
    MissingFieldTemplate { set: String, key: String },

    #[error("pattern set '{set}' has no section template named '{name}'")]
    MissingSection { set: String, name: String },

    #[error("pattern set '{set}' has no location template named '{name}'")]
    MissingLocation { set: String, name: String },

    #[error("template references placeholder '#{{{0}}}' with no runtime binding")]
    UnboundPlaceholder(String),

    #[error("no pattern set mapped for page '{0}' and no default configured")]
    NoPatternSetForPage(String),
}

/// A named bundle of selector templates.
///
/// Map values are semicolon-separated candidate templates, most specific
/// first by authoring convention. `fields` keys are element types, optionally
/// with a dot sub-type (`"checkbox.fieldSet"`); lookups fall back from the
/// sub-type key to the base key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternSet {
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, String>,
    #[serde(default)]
    pub sections: HashMap<String, String>,
    #[serde(default)]
    pub locations: HashMap<String, String>,
    /// Scrollable-container template(s) used by the retry loop.
    #[serde(default)]
    pub scroll: Option<String>,
    /// Extra element types that should attempt label indirection.
    #[serde(default)]
    pub label_eligible: Vec<String>,
}

impl PatternSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Look up the field template for an element type.
    ///
    /// Tries the exact key first (sub-type dot included), then the base type.
    /// A miss is loud: a silently empty selector would match unintended
    /// elements.
    pub fn field_template(&self, element_type: &str) -> Result<&str, ConfigError> {
        if let Some(template) = self.fields.get(element_type) {
            return Ok(template);
        }
        if let Some(base) = base_type(element_type) {
            if let Some(template) = self.fields.get(base) {
                return Ok(template);
            }
        }
        Err(ConfigError::MissingFieldTemplate {
            set: self.name.clone(),
            key: element_type.to_string(),
        })
    }

    pub fn section_template(&self, name: &str) -> Result<&str, ConfigError> {
        self.sections
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingSection {
                set: self.name.clone(),
                name: name.to_string(),
            })
    }

    pub fn location_template(&self, name: &str) -> Result<&str, ConfigError> {
        self.locations
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingLocation {
                set: self.name.clone(),
                name: name.to_string(),
            })
    }

    /// Whether label indirection should be attempted for this element type.
    pub fn is_label_eligible(&self, element_type: &str) -> bool {
        let base = base_type(element_type).unwrap_or(element_type);
        LABEL_ELIGIBLE_TYPES.contains(&base)
            || self.label_eligible.iter().any(|t| t == base || t == element_type)
    }

    /// The label template, if this set defines one.
    pub fn label_template(&self) -> Option<&str> {
        self.fields.get(LABEL_TEMPLATE_KEY).map(String::as_str)
    }
}

/// Base element type of a dotted sub-type key (`"checkbox.fieldSet"` ->
/// `"checkbox"`). `None` when there is no sub-type.
pub fn base_type(element_type: &str) -> Option<&str> {
    element_type.split_once('.').map(|(base, _)| base)
}

/// All pattern sets known to one worker.
///
/// `Clone` produces an independent snapshot; parallel workers never share a
/// registry instance.
#[derive(Debug, Clone, Default)]
pub struct PatternSetRegistry {
    sets: HashMap<String, PatternSet>,
}

impl PatternSetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a set under its declared name, replacing any previous entry.
    pub fn insert(&mut self, set: PatternSet) {
        self.sets.insert(set.name.clone(), set);
    }

    pub fn get(&self, id: &str) -> Result<&PatternSet, ConfigError> {
        self.sets
            .get(id)
            .ok_or_else(|| ConfigError::UnknownPatternSet(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sets.contains_key(id)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
