//! YAML loading for pattern sets and resolver configuration.
//!
//! One YAML document per page/component, keyed by its declared `name`:
//!
//! ```yaml
//! name: homePage
//! fields:
//!   button: "//button[text()='#{fieldName}']"
//!   input: "//input[@name='#{fieldName.lowercase}']"
//!   label: "//label[text()='#{fieldName}']"
//! sections:
//!   Login Form: "#login"
//! locations:
//!   Sidebar: "aside.side"
//! scroll: "main.content"
//! ```

use crate::config::ResolverConfig;
use fieldref_core::pattern::{PatternSet, PatternSetRegistry};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("pattern set in {0} has an empty name")]
    MissingName(PathBuf),

    #[error("duplicate pattern set name '{0}'")]
    DuplicateName(String),
}

pub struct PatternSetLoader;

impl PatternSetLoader {
    /// Load a single pattern-set file.
    pub async fn load_file(path: &Path) -> Result<PatternSet, LoadError> {
        let content = tokio::fs::read_to_string(path).await?;
        let set: PatternSet = serde_yaml::from_str(&content).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        if set.name.trim().is_empty() {
            return Err(LoadError::MissingName(path.to_path_buf()));
        }
        Ok(set)
    }

    /// Load every `*.yaml`/`*.yml` file in a directory into a fresh registry.
    /// Duplicate names across files are an error, not a silent overwrite.
    pub async fn load_dir(dir: &Path) -> Result<PatternSetRegistry, LoadError> {
        let mut registry = PatternSetRegistry::new();
        let mut entries = tokio::fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == "yaml" || e == "yml");
            if !path.is_file() || !is_yaml {
                continue;
            }

            let set = Self::load_file(&path).await?;
            if registry.contains(&set.name) {
                return Err(LoadError::DuplicateName(set.name));
            }
            debug!(pattern_set = %set.name, file = %path.display(), "loaded pattern set");
            registry.insert(set);
        }

        Ok(registry)
    }

    /// Load the resolver configuration file.
    pub async fn load_config(path: &Path) -> Result<ResolverConfig, LoadError> {
        let content = tokio::fs::read_to_string(path).await?;
        serde_yaml::from_str(&content).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}
