//! Engine configuration, read from a TOML file.
//!
//! ```toml
//! [search]
//! default_max_results = 50
//!
//! [dictionaries]
//! colors = ["red", "green", "blue"]
//! ```

use crate::EngineResult;
use datadef_model::StaticDictionaries;
use datadef_search::DEFAULT_MAX_RESULTS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Page size of searches started through the data access service.
    #[serde(default = "default_max_results")]
    pub default_max_results: usize,
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_max_results: default_max_results(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub search: SearchConfig,
    /// Values of the dictionaries backing dictionary fields.
    #[serde(default)]
    pub dictionaries: BTreeMap<String, Vec<String>>,
}

impl EngineConfig {
    /// Parses a configuration document.
    pub fn from_toml_str(contents: &str) -> EngineResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads configuration from `path`.
    ///
    /// Never fails: a missing, unreadable or malformed file yields the
    /// defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No engine config found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!(
                        dictionaries = config.dictionaries.len(),
                        "Loaded engine config from {:?}", path
                    );
                    config
                }
                Err(e) => {
                    warn!(
                        "Failed to parse engine config {:?}: {}. Falling back to defaults.",
                        path, e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read engine config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// The configured dictionaries as a dictionary collaborator.
    #[must_use]
    pub fn dictionaries(&self) -> StaticDictionaries {
        StaticDictionaries::from(self.dictionaries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datadef_model::DictionaryService;

    fn load_config_from_str(contents: &str) -> EngineConfig {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, contents).unwrap();
        EngineConfig::load_from(path)
    }

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.search.default_max_results, 25);
        assert!(config.dictionaries.is_empty());
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load_from(dir.path().join("nonexistent.toml"));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn load_from_full_file() {
        let config = load_config_from_str(
            r#"
[search]
default_max_results = 50

[dictionaries]
colors = ["red", "green", "blue"]
units = ["pcs", "kg"]
"#,
        );
        assert_eq!(config.search.default_max_results, 50);
        assert_eq!(
            config.dictionaries().values("colors"),
            vec!["red", "green", "blue"]
        );
        assert_eq!(config.dictionaries().values("units"), vec!["pcs", "kg"]);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = load_config_from_str("[dictionaries]\nunits = [\"pcs\"]\n");
        assert_eq!(config.search.default_max_results, 25);
        assert_eq!(config.dictionaries.len(), 1);
    }

    #[test]
    fn load_from_malformed_file_uses_defaults() {
        let config = load_config_from_str("[search\ndefault_max_results = ");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn load_from_directory_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load_from(dir.path());
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn from_toml_str_reports_errors() {
        let err = EngineConfig::from_toml_str("[search]\ndefault_max_results = \"many\"\n");
        assert!(err.is_err());
    }
}
