//! Active pattern-set selection.
//!
//! Priority, first hit wins: explicit caller override, URL path mapping
//! (exact match preferred over longest prefix), configured default. The
//! winner must exist in the registry.

use crate::config::ResolverConfig;
use fieldref_core::pattern::{ConfigError, PatternSetRegistry};
use tracing::debug;
use url::Url;

pub fn resolve_pattern_set(
    config: &ResolverConfig,
    registry: &PatternSetRegistry,
    current_url: &str,
    explicit_override: Option<&str>,
) -> Result<String, ConfigError> {
    if let Some(id) = explicit_override {
        registry.get(id)?;
        return Ok(id.to_string());
    }

    let path = url_path(current_url);
    if let Some(id) = match_mapping(config, &path) {
        registry.get(id)?;
        debug!(page = %path, pattern_set = %id, "pattern set from page mapping");
        return Ok(id.to_string());
    }

    if let Some(id) = &config.default_pattern_set {
        registry.get(id)?;
        return Ok(id.clone());
    }

    Err(ConfigError::NoPatternSetForPage(current_url.to_string()))
}

/// Exact path match wins; otherwise the longest mapping key that is a
/// path-segment prefix of the current path.
fn match_mapping<'a>(config: &'a ResolverConfig, path: &str) -> Option<&'a str> {
    if let Some(id) = config.page_mapping.get(path) {
        return Some(id);
    }

    config
        .page_mapping
        .iter()
        .filter(|(pattern, _)| is_segment_prefix(pattern, path))
        .max_by_key(|(pattern, _)| pattern.len())
        .map(|(_, id)| id.as_str())
}

fn is_segment_prefix(pattern: &str, path: &str) -> bool {
    let pattern = pattern.trim_end_matches('/');
    match path.strip_prefix(pattern) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Path component of the current URL. Bare paths (`/checkout`) are accepted
/// as-is so callers without a full URL still map correctly.
fn url_path(current_url: &str) -> String {
    match Url::parse(current_url) {
        Ok(url) => url.path().to_string(),
        Err(_) => current_url.split(['?', '#']).next().unwrap_or("").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldref_core::pattern::PatternSet;

    fn registry_with(names: &[&str]) -> PatternSetRegistry {
        let mut registry = PatternSetRegistry::new();
        for name in names {
            registry.insert(PatternSet::new(*name));
        }
        registry
    }

    fn config_with(mapping: &[(&str, &str)], default: Option<&str>) -> ResolverConfig {
        ResolverConfig {
            default_pattern_set: default.map(String::from),
            page_mapping: mapping
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn explicit_override_wins_over_mapping() {
        let registry = registry_with(&["checkoutPage", "special"]);
        let config = config_with(&[("/checkout", "checkoutPage")], None);
        let id =
            resolve_pattern_set(&config, &registry, "/checkout", Some("special")).unwrap();
        assert_eq!(id, "special");
    }

    #[test]
    fn mapping_wins_over_default() {
        let registry = registry_with(&["checkoutPage", "homePage"]);
        let config = config_with(&[("/checkout", "checkoutPage")], Some("homePage"));
        let id = resolve_pattern_set(&config, &registry, "/checkout", None).unwrap();
        assert_eq!(id, "checkoutPage");
    }

    #[test]
    fn full_url_maps_by_path() {
        let registry = registry_with(&["checkoutPage"]);
        let config = config_with(&[("/checkout", "checkoutPage")], None);
        let id = resolve_pattern_set(
            &config,
            &registry,
            "https://shop.example/checkout?step=2",
            None,
        )
        .unwrap();
        assert_eq!(id, "checkoutPage");
    }

    #[test]
    fn longest_prefix_wins_but_exact_beats_prefix() {
        let registry = registry_with(&["a", "b", "c"]);
        let config = config_with(
            &[("/shop", "a"), ("/shop/cart", "b"), ("/shop/cart/items", "c")],
            None,
        );
        assert_eq!(
            resolve_pattern_set(&config, &registry, "/shop/cart", None).unwrap(),
            "b"
        );
        assert_eq!(
            resolve_pattern_set(&config, &registry, "/shop/cart/checkout", None).unwrap(),
            "b"
        );
        assert_eq!(
            resolve_pattern_set(&config, &registry, "/shop/other", None).unwrap(),
            "a"
        );
    }

    #[test]
    fn prefix_match_respects_segment_boundaries() {
        let registry = registry_with(&["a", "home"]);
        let config = config_with(&[("/shop", "a")], Some("home"));
        // "/shopping" is not under "/shop".
        assert_eq!(
            resolve_pattern_set(&config, &registry, "/shopping", None).unwrap(),
            "home"
        );
    }

    #[test]
    fn unregistered_winner_is_config_error() {
        let registry = registry_with(&[]);
        let config = config_with(&[], Some("homePage"));
        assert!(matches!(
            resolve_pattern_set(&config, &registry, "/x", None),
            Err(ConfigError::UnknownPatternSet(_))
        ));
    }

    #[test]
    fn nothing_matches_is_config_error() {
        let registry = registry_with(&["homePage"]);
        let config = config_with(&[], None);
        assert!(matches!(
            resolve_pattern_set(&config, &registry, "/x", None),
            Err(ConfigError::NoPatternSetForPage(_))
        ));
    }
}
