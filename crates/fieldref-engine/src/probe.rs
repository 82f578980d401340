//! The probe seam.
//!
//! This is the only backend-dependent operation in locator resolution: the
//! engine composes selector strings and asks the probe about the live page.
//! Everything else is pure data manipulation on pattern sets.
//!
//! Implementations wrap a browser driver; tests use scripted mocks.

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by the underlying driver.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    /// Driver-level failure (session gone, protocol error, timeout).
    #[error("driver error: {0}")]
    Driver(String),

    /// The driver rejected the selector syntax.
    #[error("invalid selector '{0}'")]
    InvalidSelector(String),
}

/// Answers existence/visibility/scroll queries against the live page.
///
/// Selectors may contain ` >> ` nested-search separators and a trailing
/// `nth=N` qualifier; interpreting those is the implementation's concern.
#[async_trait]
pub trait ElementProbe: Send + Sync {
    /// Whether at least one element matches the selector.
    async fn exists(&self, selector: &str) -> Result<bool, ProbeError>;

    /// Whether at least one matching element is visible.
    async fn visible(&self, selector: &str) -> Result<bool, ProbeError>;

    /// Number of elements matching the selector.
    async fn count(&self, selector: &str) -> Result<usize, ProbeError>;

    /// Scroll the first matching element into the viewport.
    async fn scroll_into_view(&self, selector: &str) -> Result<(), ProbeError>;

    /// Read an attribute off the first matching element.
    async fn get_attribute(&self, selector: &str, name: &str)
        -> Result<Option<String>, ProbeError>;
}
