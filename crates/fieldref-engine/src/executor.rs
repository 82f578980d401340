//! One probing pass over an ordered candidate list.

use crate::probe::{ElementProbe, ProbeError};
use fieldref_core::chain::ResolvedLocator;
use tracing::{debug, warn};

/// Success criterion for a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// The matched element must exist and be visible. The default.
    #[default]
    Required,
    /// Existence is enough. Callers must opt in; most interactions need a
    /// visible element.
    AttachedOnly,
}

/// Outcome of a single pass.
#[derive(Debug)]
pub enum ProbeOutcome {
    Matched { selector: String },
    NotResolved { existed_invisible: Vec<String> },
}

/// Probe candidates strictly in order and return the first acceptable match.
///
/// Within one pass a candidate is probed at most once; re-probing is the
/// retry controller's job. An exists-but-invisible candidate is recorded and
/// skipped. When the winner's unindexed selector matches more than one live
/// element the match is ambiguous and logged, never failed.
pub async fn probe_once(
    locator: &ResolvedLocator,
    visibility: Visibility,
    probe: &dyn ElementProbe,
) -> Result<ProbeOutcome, ProbeError> {
    let mut existed_invisible = Vec::new();

    for candidate in &locator.candidates {
        if !probe.exists(&candidate.selector).await? {
            continue;
        }

        if visibility == Visibility::Required && !probe.visible(&candidate.selector).await? {
            debug!(selector = %candidate.selector, "candidate exists but is not visible");
            existed_invisible.push(candidate.selector.clone());
            continue;
        }

        if !candidate.has_instance_qualifier() {
            match probe.count(&candidate.base).await {
                Ok(n) if n > 1 => warn!(
                    selector = %candidate.base,
                    matches = n,
                    target = %locator.description,
                    "ambiguous match: selector matches more than one element"
                ),
                _ => {}
            }
        }

        debug!(selector = %candidate.selector, target = %locator.description, "candidate matched");
        return Ok(ProbeOutcome::Matched {
            selector: candidate.selector.clone(),
        });
    }

    Ok(ProbeOutcome::NotResolved { existed_invisible })
}
