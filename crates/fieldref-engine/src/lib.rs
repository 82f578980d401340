//! Locator resolution engine for UI tests.
//!
//! Test authors refer to elements by semantic field names ("Username",
//! "{Login Form} Submit") instead of raw selectors. Pattern sets of selector
//! templates, keyed by page and element type, are resolved at run time into
//! ordered candidate lists and tried against the live page (via the
//! [`probe::ElementProbe`] seam) until one matches a visible element, with
//! scroll/backoff retries, caching and a static-override escape hatch.

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod loader;
pub mod probe;
pub mod resolver;
pub mod retry;

pub use fieldref_core::chain;
pub use fieldref_core::descriptor;
pub use fieldref_core::pattern;
pub use fieldref_core::substitute;

pub use cache::{CacheKey, LocatorCache, StaticOverrideTable};
pub use config::ResolverConfig;
pub use error::{NotFoundReport, ResolveError};
pub use executor::Visibility;
pub use probe::{ElementProbe, ProbeError};
pub use resolver::{LocatorResolver, ResolutionRequest};
