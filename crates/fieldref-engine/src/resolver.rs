//! The resolution facade: static override, cache, chain building with label
//! indirection, then the retry loop against the probe.

use crate::cache::{CacheKey, LocatorCache, StaticOverrideTable};
use crate::config::ResolverConfig;
use crate::context::resolve_pattern_set;
use crate::error::{NotFoundReport, ResolveError};
use crate::executor::Visibility;
use crate::probe::ElementProbe;
use crate::retry::RetryScrollController;
use fieldref_core::chain::{self, ResolvedLocator};
use fieldref_core::descriptor::FieldDescriptor;
use fieldref_core::pattern::{PatternSet, PatternSetRegistry};
use fieldref_core::substitute::{expand, Bindings};
use tokio::time::Instant;
use tracing::{debug, info};

/// One resolution request from the step layer.
#[derive(Debug, Clone)]
pub struct ResolutionRequest<'a> {
    pub element_type: &'a str,
    pub field: &'a str,
    /// Current page URL, used for pattern-set mapping.
    pub page_url: &'a str,
    /// Field-level pattern-set escape hatch.
    pub pattern_set: Option<&'a str>,
}

/// Ephemeral per-call state. Owned exclusively by the call; never shared
/// across concurrent resolutions, so nested scenarios cannot leak context.
#[derive(Debug)]
struct ResolutionContext {
    pattern_set: String,
    element_type: String,
    descriptor: FieldDescriptor,
}

/// Per-worker resolution engine.
///
/// Each parallel test worker owns its own resolver (registry snapshot and
/// cache included); nothing here is shared mutable state.
pub struct LocatorResolver {
    config: ResolverConfig,
    registry: PatternSetRegistry,
    overrides: StaticOverrideTable,
    cache: LocatorCache,
}

impl LocatorResolver {
    pub fn new(config: ResolverConfig, registry: PatternSetRegistry) -> Self {
        Self {
            config,
            registry,
            overrides: StaticOverrideTable::new(),
            cache: LocatorCache::new(),
        }
    }

    pub fn with_overrides(mut self, overrides: StaticOverrideTable) -> Self {
        self.overrides = overrides;
        self
    }

    /// Scenario-boundary lifecycle hook.
    pub fn clear_cache(&mut self) {
        self.cache.clear_all();
    }

    pub fn invalidate(&mut self, key: &CacheKey) {
        self.cache.invalidate(key);
    }

    /// Resolve a field reference to a single concrete selector, requiring a
    /// visible match.
    pub async fn resolve(
        &mut self,
        request: &ResolutionRequest<'_>,
        probe: &dyn ElementProbe,
    ) -> Result<String, ResolveError> {
        self.resolve_with(request, Visibility::Required, None, probe)
            .await
    }

    /// Resolve with an explicit success criterion and optional step-level
    /// deadline.
    pub async fn resolve_with(
        &mut self,
        request: &ResolutionRequest<'_>,
        visibility: Visibility,
        deadline: Option<Instant>,
        probe: &dyn ElementProbe,
    ) -> Result<String, ResolveError> {
        if !self.config.enable {
            // Passthrough mode: the field string already is a selector.
            return Ok(request.field.to_string());
        }

        let pattern_set = resolve_pattern_set(
            &self.config,
            &self.registry,
            request.page_url,
            request.pattern_set,
        )?;
        let descriptor = FieldDescriptor::parse(request.field)?;
        let ctx = ResolutionContext {
            pattern_set,
            element_type: request.element_type.to_string(),
            descriptor,
        };

        let override_key = StaticOverrideTable::qualified_key(
            &ctx.pattern_set,
            &ctx.element_type,
            &ctx.descriptor.field_name,
        );
        if let Some(selector) = self.overrides.lookup(&override_key) {
            debug!(key = %override_key, selector = %selector, "static override hit");
            return Ok(selector.to_string());
        }

        let cache_key = CacheKey::new(&ctx.pattern_set, &ctx.element_type, &ctx.descriptor);
        if let Some(selector) = self.cache.get(&cache_key) {
            debug!(selector = %selector, "locator cache hit");
            return Ok(selector.to_string());
        }

        let set = self.registry.get(&ctx.pattern_set)?.clone();
        let locator = build_locator(&set, &ctx, probe).await?;
        let scroll_candidates = match &set.scroll {
            Some(template) => expand(template, &Bindings::for_descriptor(&ctx.descriptor))?,
            None => Vec::new(),
        };

        let controller = {
            let base = RetryScrollController::new(
                self.config.retry_timeout(),
                self.config.retry_interval(),
            );
            match deadline {
                Some(d) => base.with_deadline(d),
                None => base,
            }
        };

        match controller
            .resolve(&locator, &scroll_candidates, visibility, probe)
            .await
        {
            Ok(selector) => {
                info!(target = %locator.description, selector = %selector, "resolved");
                self.cache.store(cache_key, selector.clone());
                Ok(selector)
            }
            Err(exhausted) => {
                let exhausted = *exhausted;
                Err(ResolveError::ElementNotFound(Box::new(NotFoundReport {
                    pattern_set: ctx.pattern_set,
                    element_type: ctx.element_type,
                    descriptor: ctx.descriptor,
                    candidates: exhausted.candidates,
                    existed_invisible: exhausted.existed_invisible,
                    elapsed: exhausted.elapsed,
                })))
            }
        }
    }
}

/// Expand field candidates (label indirection included) and compose the
/// container chain.
async fn build_locator(
    set: &PatternSet,
    ctx: &ResolutionContext,
    probe: &dyn ElementProbe,
) -> Result<ResolvedLocator, ResolveError> {
    let bindings = Bindings::for_descriptor(&ctx.descriptor);
    let mut fields = chain::field_candidates(set, &ctx.element_type, &bindings)?;

    if set.is_label_eligible(&ctx.element_type) {
        if let Some(for_id) = find_label_for_id(set, &bindings, probe).await? {
            debug!(for_id = %for_id, field = %ctx.descriptor.field_name, "label indirection hit");
            let labeled = bindings.clone().with_for_id(for_id);
            let with_id = chain::field_candidates(set, &ctx.element_type, &labeled)?;
            // Candidates unlocked by the forId binding go first.
            let mut merged: Vec<String> = with_id
                .into_iter()
                .filter(|c| !fields.contains(c))
                .collect();
            merged.append(&mut fields);
            fields = merged;
        }
    }

    Ok(chain::compose(set, &ctx.descriptor, &ctx.element_type, fields)?)
}

/// Best-effort label lookup: expand the label template, find an existing
/// label element, read its `for` reference. A miss is silent; resolution
/// simply proceeds without the `forId` binding.
async fn find_label_for_id(
    set: &PatternSet,
    bindings: &Bindings,
    probe: &dyn ElementProbe,
) -> Result<Option<String>, ResolveError> {
    let Some(template) = set.label_template() else {
        return Ok(None);
    };

    for candidate in expand(template, bindings)? {
        let exists = match probe.exists(&candidate).await {
            Ok(v) => v,
            Err(e) => {
                debug!(error = %e, selector = %candidate, "label probe failed, skipping");
                continue;
            }
        };
        if !exists {
            continue;
        }
        match probe.get_attribute(&candidate, "for").await {
            Ok(Some(for_id)) if !for_id.trim().is_empty() => return Ok(Some(for_id)),
            Ok(_) => continue,
            Err(e) => {
                debug!(error = %e, selector = %candidate, "label attribute read failed");
                continue;
            }
        }
    }
    Ok(None)
}
