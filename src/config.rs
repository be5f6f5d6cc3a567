//! Configuration file support for vulnpath.
//!
//! Provides YAML-based configuration through `vulnpath.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::shared::Result;

const CONFIG_FILENAME: &str = "vulnpath.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub frameworks: Option<Vec<String>>,
    pub registry_url: Option<String>,
    pub offline_registry: Option<String>,
    pub include_prerelease: Option<bool>,
    pub max_parallel: Option<usize>,
    pub severity_threshold: Option<String>,
    pub ignore_advisories: Option<Vec<IgnoreAdvisory>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yml::Value>,
}

/// An advisory entry to ignore during the audit.
#[derive(Debug, Deserialize)]
pub struct IgnoreAdvisory {
    pub id: String,
    pub reason: Option<String>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yml::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref ignore_advisories) = config.ignore_advisories {
        for (i, entry) in ignore_advisories.iter().enumerate() {
            if entry.id.trim().is_empty() {
                bail!(
                    "Invalid config: ignore_advisories[{}].id must not be empty.\n\n\
                     💡 Hint: Each ignore_advisories entry must have a non-empty 'id' field (e.g., \"GHSA-xxxx\" or \"CVE-2024-1234\").",
                    i
                );
            }
        }
    }

    if let Some(max_parallel) = config.max_parallel {
        if max_parallel == 0 {
            bail!(
                "Invalid config: max_parallel must be at least 1.\n\n\
                 💡 Hint: Use a small number (e.g., 8) to bound concurrent registry requests."
            );
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
format: json
frameworks:
  - net8.0
registry_url: https://registry.example.com
include_prerelease: true
max_parallel: 4
severity_threshold: HIGH
ignore_advisories:
  - id: GHSA-aaaa-bbbb-cccc
    reason: "Not applicable to our usage"
  - id: CVE-2024-5678
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.format.as_deref(), Some("json"));
        assert_eq!(
            config.frameworks.as_deref(),
            Some(&["net8.0".to_string()][..])
        );
        assert_eq!(
            config.registry_url.as_deref(),
            Some("https://registry.example.com")
        );
        assert_eq!(config.include_prerelease, Some(true));
        assert_eq!(config.max_parallel, Some(4));
        assert_eq!(config.severity_threshold.as_deref(), Some("HIGH"));
        let ignored = config.ignore_advisories.unwrap();
        assert_eq!(ignored.len(), 2);
        assert_eq!(ignored[0].id, "GHSA-aaaa-bbbb-cccc");
        assert_eq!(
            ignored[0].reason.as_deref(),
            Some("Not applicable to our usage")
        );
        assert!(ignored[1].reason.is_none());
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "format: console\n").unwrap();

        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_some());
        assert_eq!(config.unwrap().format.as_deref(), Some("console"));
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        assert!(result.is_err());
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad.yml");
        fs::write(&config_path, "invalid: yaml: [[[broken").unwrap();

        let result = load_config_from_path(&config_path);
        assert!(result.is_err());
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_empty_advisory_id_validation_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
ignore_advisories:
  - id: "   "
    reason: "whitespace only"
"#,
        )
        .unwrap();

        let result = load_config_from_path(&config_path);
        assert!(result.is_err());
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("must not be empty"));
    }

    #[test]
    fn test_zero_max_parallel_validation_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "max_parallel: 0\n").unwrap();

        let result = load_config_from_path(&config_path);
        assert!(result.is_err());
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("must be at least 1"));
    }

    #[test]
    fn test_unknown_fields_warning() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
format: json
unknown_field: true
another_unknown: value
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.unknown_fields.len(), 2);
        assert!(config.unknown_fields.contains_key("unknown_field"));
        assert!(config.unknown_fields.contains_key("another_unknown"));
    }

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();
        assert!(config.format.is_none());
        assert!(config.frameworks.is_none());
        assert!(config.registry_url.is_none());
        assert!(config.offline_registry.is_none());
        assert!(config.include_prerelease.is_none());
        assert!(config.max_parallel.is_none());
        assert!(config.severity_threshold.is_none());
        assert!(config.ignore_advisories.is_none());
        assert!(config.unknown_fields.is_empty());
    }
}
