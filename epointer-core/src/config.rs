//! Configuration loading from epointer.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::EpointerError;

/// File name looked up in the package directory.
pub const CONFIG_FILE_NAME: &str = "epointer.toml";

/// Main configuration structure for epointer.toml.
#[derive(Debug, Deserialize, Default)]
pub struct EpointerConfig {
    /// Build tags applied on every run.
    pub tags: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output file, relative to the package directory.
    pub file: Option<String>,
    /// Listing format: "plain" or "json".
    pub format: Option<String>,
}

impl EpointerConfig {
    /// Configured tags, or none.
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }

    pub fn output_file(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.file.as_deref())
    }

    /// Whether listings default to JSON.
    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Loads configuration from epointer.toml if it exists.
pub fn load_config(dir: &Path) -> Result<Option<EpointerConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content)
        .map_err(|e| EpointerError::config(&path, e.to_string()))
        .context("Invalid epointer.toml")?;
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let cfg: EpointerConfig = toml::from_str(
            "tags = [\"tag\", \"linux\"]\n[output]\nfile = \"ptr_gen.go\"\nformat = \"JSON\"\n",
        )
        .unwrap();
        assert_eq!(cfg.tags(), ["tag", "linux"]);
        assert_eq!(cfg.output_file(), Some("ptr_gen.go"));
        assert!(cfg.wants_json());
    }

    #[test]
    fn test_empty_config() {
        let cfg: EpointerConfig = toml::from_str("").unwrap();
        assert!(cfg.tags().is_empty());
        assert_eq!(cfg.output_file(), None);
        assert!(!cfg.wants_json());
    }

    #[test]
    fn test_invalid_config_is_typed_error() {
        let dir = std::env::temp_dir().join(format!("epointer_config_invalid_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE_NAME), "tags = \"not a list\"\n").unwrap();

        let err = load_config(&dir).unwrap_err();
        match err.downcast_ref::<EpointerError>() {
            Some(EpointerError::Config { path, .. }) => {
                assert_eq!(path, &dir.join(CONFIG_FILE_NAME));
            }
            other => panic!("expected config error, got {:?}", other),
        }
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = std::env::temp_dir().join("epointer_config_missing_dir");
        assert!(load_config(&dir).unwrap().is_none());
    }
}
