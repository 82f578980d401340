//! Resolver configuration schema.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// When false the engine is a passthrough: field strings are handed to
    /// the driver untouched, for suites written against raw selectors.
    #[serde(default = "default_enable")]
    pub enable: bool,

    /// Pattern set used when neither an explicit override nor the URL
    /// mapping applies.
    #[serde(default)]
    pub default_pattern_set: Option<String>,

    #[serde(default = "default_retry_timeout_ms")]
    pub retry_timeout_ms: u64,

    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,

    /// URL path (or path prefix) to pattern-set id.
    #[serde(default)]
    pub page_mapping: HashMap<String, String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            enable: default_enable(),
            default_pattern_set: None,
            retry_timeout_ms: default_retry_timeout_ms(),
            retry_interval_ms: default_retry_interval_ms(),
            page_mapping: HashMap::new(),
        }
    }
}

impl ResolverConfig {
    pub fn retry_timeout(&self) -> Duration {
        Duration::from_millis(self.retry_timeout_ms)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

fn default_enable() -> bool {
    true
}

fn default_retry_timeout_ms() -> u64 {
    10000
}

fn default_retry_interval_ms() -> u64 {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_yaml() {
        let config: ResolverConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.enable);
        assert_eq!(config.retry_timeout_ms, 10000);
        assert_eq!(config.retry_interval_ms, 500);
        assert!(config.default_pattern_set.is_none());
        assert!(config.page_mapping.is_empty());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let yaml = r#"
enable: false
default_pattern_set: homePage
retry_timeout_ms: 2000
retry_interval_ms: 100
page_mapping:
  /checkout: checkoutPage
"#;
        let config: ResolverConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(!config.enable);
        assert_eq!(config.default_pattern_set.as_deref(), Some("homePage"));
        assert_eq!(config.page_mapping["/checkout"], "checkoutPage");
    }
}
