//! YAML scan configuration.
//!
//! One file carries the winnowing settings and, optionally, the path of the
//! BOM rules used to curate the scan's match results.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # OSSID scan configuration
//! version: "1"
//! name: "nightly"
//!
//! winnowing:
//!   skip_snippets: false
//!   all_extensions: false
//!   hpsm: true
//!   obfuscate: false
//!   max_snippet_lines: 2000
//!
//! bom_path: "sbom.json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use curation::{CurationError, RuleSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use winnowing::{Winnowing, WinnowingConfig};

/// Errors that can occur when loading configuration or BOM files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("failed to load BOM rules: {0}")]
    Bom(#[from] CurationError),
}

/// Top-level scan configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScanConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub winnowing: WinnowingConfig,

    /// BOM rules file applied to this scan's results
    #[serde(default)]
    pub bom_path: Option<PathBuf>,
}

impl ScanConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: ScanConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.winnowing
            .validate()
            .map_err(|err| ConfigLoadError::Validation(err.to_string()))?;

        if let Some(path) = &self.bom_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigLoadError::Validation(
                    "bom_path must not be empty".into(),
                ));
            }
        }
        Ok(())
    }

    /// Build a fingerprinting engine from the `winnowing` section.
    pub fn engine(&self) -> Result<Winnowing, ConfigLoadError> {
        Winnowing::new(self.winnowing.clone())
            .map_err(|err| ConfigLoadError::Validation(err.to_string()))
    }

    /// Load the BOM rules named by `bom_path`; no path means no rules.
    pub fn load_rule_set(&self) -> Result<RuleSet, ConfigLoadError> {
        match &self.bom_path {
            Some(path) => load_rule_set(path),
            None => Ok(RuleSet::default()),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            name: None,
            winnowing: WinnowingConfig::default(),
            bom_path: None,
        }
    }
}

/// Read and parse a `{ "bom": { ... } }` rules file.
pub fn load_rule_set<P: AsRef<Path>>(path: P) -> Result<RuleSet, ConfigLoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let rules = RuleSet::from_json(&content)?;
    info!(
        path = %path.display(),
        include = rules.include.len(),
        remove = rules.remove.len(),
        replace = rules.replace.len(),
        "bom_loaded"
    );
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_full_configuration() {
        let yaml = r#"
version: "1"
name: "nightly"
winnowing:
  hpsm: true
  max_snippet_lines: 2000
bom_path: "sbom.json"
"#;
        let config = ScanConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.name.as_deref(), Some("nightly"));
        assert!(config.winnowing.hpsm);
        assert!(!config.winnowing.skip_snippets);
        assert_eq!(config.winnowing.max_snippet_lines, Some(2000));
        assert_eq!(config.bom_path, Some(PathBuf::from("sbom.json")));
    }

    #[test]
    fn minimal_configuration_uses_defaults() {
        let config = ScanConfig::from_yaml("version: \"1.0\"\n").unwrap();
        assert_eq!(config.winnowing, WinnowingConfig::default());
        assert!(config.bom_path.is_none());
        assert!(config.load_rule_set().unwrap().is_empty());
    }

    #[test]
    fn rejects_unsupported_version() {
        let err = ScanConfig::from_yaml("version: \"2\"\n").unwrap_err();
        assert!(matches!(err, ConfigLoadError::UnsupportedVersion(v) if v == "2"));
    }

    #[test]
    fn rejects_invalid_winnowing_section() {
        let yaml = "version: \"1\"\nwinnowing:\n  max_snippet_lines: 0\n";
        assert!(matches!(
            ScanConfig::from_yaml(yaml),
            Err(ConfigLoadError::Validation(_))
        ));
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(matches!(
            ScanConfig::from_yaml("version: [unclosed"),
            Err(ConfigLoadError::YamlParse(_))
        ));
    }

    #[test]
    fn from_file_and_bom_loading() {
        let mut bom = NamedTempFile::new().unwrap();
        write!(
            bom,
            r#"{{ "bom": {{ "remove": [ {{ "purl": "pkg:npm/left-pad" }} ] }} }}"#
        )
        .unwrap();

        let mut cfg = NamedTempFile::new().unwrap();
        writeln!(cfg, "version: \"1\"").unwrap();
        writeln!(cfg, "bom_path: \"{}\"", bom.path().display()).unwrap();

        let config = ScanConfig::from_file(cfg.path()).unwrap();
        let rules = config.load_rule_set().unwrap();
        assert_eq!(rules.remove.len(), 1);
        assert_eq!(rules.remove[0].target.purl(), Some("pkg:npm/left-pad"));
    }

    #[test]
    fn bad_bom_file_is_reported() {
        let mut bom = NamedTempFile::new().unwrap();
        write!(bom, "{{ not json").unwrap();
        assert!(matches!(
            load_rule_set(bom.path()),
            Err(ConfigLoadError::Bom(CurationError::MalformedDocument(_)))
        ));
        assert!(matches!(
            load_rule_set("/nonexistent/ossid/bom.json"),
            Err(ConfigLoadError::FileRead(_))
        ));
    }

    #[test]
    fn engine_follows_winnowing_section() {
        let config = ScanConfig::from_yaml("version: \"1\"\nwinnowing:\n  obfuscate: true\n").unwrap();
        let engine = config.engine().unwrap();
        assert!(engine.obfuscation_map().is_some());
    }
}
