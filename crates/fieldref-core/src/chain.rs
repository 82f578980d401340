//! Candidate chain composition.
//!
//! Container candidates (location, section) wrap field candidates with the
//! ` >> ` nested-search separator: the driver layer searches for the right
//! side only within the element matched by the left side. This module only
//! composes strings; it never evaluates a selector.

use crate::descriptor::FieldDescriptor;
use crate::pattern::{ConfigError, PatternSet};
use crate::substitute::{expand, Bindings};

/// Separator understood by the probe collaborator as "search within the
/// previous match".
pub const CHAIN_SEPARATOR: &str = " >> ";

/// One fully composed selector candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The selector handed to the probe, instance qualifier included.
    pub selector: String,
    /// The same selector without the instance qualifier. Used to detect
    /// ambiguous matches before instance indexing is applied.
    pub base: String,
}

impl Candidate {
    fn new(base: String, instance: u32) -> Self {
        let selector = if instance > 1 {
            // Playwright-style nth qualifier, 0-based on the wire.
            format!("{base}{CHAIN_SEPARATOR}nth={}", instance - 1)
        } else {
            base.clone()
        };
        Self { selector, base }
    }

    pub fn has_instance_qualifier(&self) -> bool {
        self.selector != self.base
    }
}

/// Ordered, fully composed candidate list for one resolution attempt.
#[derive(Debug, Clone)]
pub struct ResolvedLocator {
    pub candidates: Vec<Candidate>,
    /// Composed container chain (location/section), when the descriptor has
    /// containers. Diagnostic only.
    pub chain_prefix: Option<String>,
    pub description: String,
}

impl ResolvedLocator {
    pub fn selectors(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.selector.clone()).collect()
    }
}

/// Expand the field template for an element type into raw field candidates.
pub fn field_candidates(
    set: &PatternSet,
    element_type: &str,
    bindings: &Bindings,
) -> Result<Vec<String>, ConfigError> {
    expand(set.field_template(element_type)?, bindings)
}

/// Compose location/section/field candidates into the final ordered list.
///
/// Field-candidate priority is preserved within each container candidate;
/// container candidates multiply the list in their own authoring order. The
/// instance qualifier applies to the innermost field candidate only, never
/// to containers.
pub fn compose(
    set: &PatternSet,
    descriptor: &FieldDescriptor,
    element_type: &str,
    fields: Vec<String>,
) -> Result<ResolvedLocator, ConfigError> {
    let bindings = Bindings::for_descriptor(descriptor);

    let sections = match &descriptor.section_name {
        Some(name) => expand(set.section_template(name)?, &bindings)?,
        None => Vec::new(),
    };
    let locations = match &descriptor.location_name {
        Some(name) => expand(set.location_template(name)?, &bindings)?,
        None => Vec::new(),
    };

    let containers = cross_containers(&locations, &sections);

    let mut candidates = Vec::new();
    match &containers {
        Some(prefixes) => {
            for prefix in prefixes {
                for field in &fields {
                    candidates.push(Candidate::new(
                        format!("{prefix}{CHAIN_SEPARATOR}{field}"),
                        descriptor.instance,
                    ));
                }
            }
        }
        None => {
            for field in fields {
                candidates.push(Candidate::new(field, descriptor.instance));
            }
        }
    }

    let chain_prefix = containers.and_then(|p| p.into_iter().next());

    Ok(ResolvedLocator {
        candidates,
        chain_prefix,
        description: describe(descriptor, element_type, &set.name),
    })
}

/// Cross location candidates with section candidates into container chain
/// prefixes. `None` when the descriptor has no containers at all.
fn cross_containers(locations: &[String], sections: &[String]) -> Option<Vec<String>> {
    match (locations.is_empty(), sections.is_empty()) {
        (true, true) => None,
        (true, false) => Some(sections.to_vec()),
        (false, true) => Some(locations.to_vec()),
        (false, false) => {
            let mut chains = Vec::with_capacity(locations.len() * sections.len());
            for location in locations {
                for section in sections {
                    chains.push(format!("{location}{CHAIN_SEPARATOR}{section}"));
                }
            }
            Some(chains)
        }
    }
}

fn describe(descriptor: &FieldDescriptor, element_type: &str, set_name: &str) -> String {
    format!(
        "{} '{}' (pattern set '{}')",
        element_type, descriptor, set_name
    )
}
