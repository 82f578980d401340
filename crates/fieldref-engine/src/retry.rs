//! Timeout-bounded retry loop with scroll-into-view between passes.

use crate::executor::{self, ProbeOutcome, Visibility};
use crate::probe::ElementProbe;
use fieldref_core::chain::ResolvedLocator;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Diagnostics from an exhausted retry budget. The resolver folds this into
/// a full `NotFoundReport`.
#[derive(Debug)]
pub struct RetryExhausted {
    pub candidates: Vec<String>,
    pub existed_invisible: Vec<String>,
    pub elapsed: Duration,
    pub passes: u32,
}

pub struct RetryScrollController {
    timeout: Duration,
    interval: Duration,
    /// External step-level deadline. When it is tighter than the retry
    /// budget it caps it, so a step timeout surfaces as element-not-found
    /// instead of a generic cancellation.
    deadline: Option<Instant>,
}

impl RetryScrollController {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self {
            timeout,
            interval,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Probe until a candidate matches or the wall-clock budget runs out.
    ///
    /// Uses a monotonic clock; the last sleep never pushes total time past
    /// the budget by more than one interval.
    pub async fn resolve(
        &self,
        locator: &ResolvedLocator,
        scroll_candidates: &[String],
        visibility: Visibility,
        probe: &dyn ElementProbe,
    ) -> Result<String, Box<RetryExhausted>> {
        let start = Instant::now();
        let budget = match self.deadline {
            Some(deadline) => self.timeout.min(deadline.saturating_duration_since(start)),
            None => self.timeout,
        };

        let mut passes = 0u32;
        let mut last_invisible: Vec<String> = Vec::new();

        loop {
            passes += 1;
            match executor::probe_once(locator, visibility, probe).await {
                Ok(ProbeOutcome::Matched { selector }) => return Ok(selector),
                Ok(ProbeOutcome::NotResolved { existed_invisible }) => {
                    last_invisible = existed_invisible;
                }
                Err(e) => {
                    // Driver hiccups are transient within the retry budget.
                    debug!(error = %e, "probe pass failed, will retry");
                }
            }

            if start.elapsed() >= budget {
                return Err(Box::new(RetryExhausted {
                    candidates: locator.selectors(),
                    existed_invisible: last_invisible,
                    elapsed: start.elapsed(),
                    passes,
                }));
            }

            self.scroll_toward(&last_invisible, scroll_candidates, probe)
                .await;
            sleep(self.interval).await;
        }
    }

    /// Bring the likeliest candidate into the viewport before the next pass:
    /// the first existing-but-invisible candidate, or the configured scroll
    /// containers when nothing has matched yet. Scrolling is enabled by the
    /// pattern set defining scroll containers; failures never abort the loop.
    async fn scroll_toward(
        &self,
        existed_invisible: &[String],
        scroll_candidates: &[String],
        probe: &dyn ElementProbe,
    ) {
        if scroll_candidates.is_empty() {
            return;
        }

        if let Some(target) = existed_invisible.first() {
            debug!(selector = %target, "scrolling existed-but-invisible candidate into view");
            if let Err(e) = probe.scroll_into_view(target).await {
                debug!(error = %e, "scroll failed");
            }
            return;
        }

        for container in scroll_candidates {
            match probe.exists(container).await {
                Ok(true) => {
                    debug!(selector = %container, "scrolling configured container into view");
                    if let Err(e) = probe.scroll_into_view(container).await {
                        debug!(error = %e, "scroll failed");
                    }
                    return;
                }
                Ok(false) => continue,
                Err(_) => return,
            }
        }
    }
}
