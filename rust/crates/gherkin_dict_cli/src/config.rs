//! `gherkin-dict.toml` configuration.

use std::fs;
use std::path::{Path, PathBuf};

use gherkin_dict_core::ProjectInfo;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "gherkin-dict.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictConfig {
    pub project: ProjectInfo,
    pub generate: GenerateConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Where the snapshot document is written.
    pub output: PathBuf,
    /// Maximum number of records taken from an export.
    pub limit: usize,
    /// Jira field holding the Gherkin text.
    pub jira_field: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        GenerateConfig {
            output: PathBuf::from("public/data.json"),
            limit: 500,
            jira_field: "description".to_string(),
        }
    }
}

impl DictConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generate.limit == 0 {
            return Err(ConfigError::Invalid {
                message: "generate.limit must be greater than zero".to_string(),
            });
        }
        if self.generate.jira_field.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "generate.jira_field must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

pub fn parse_config(text: &str, path: &Path) -> Result<DictConfig, ConfigError> {
    let config: DictConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads the config at `path`; a missing file means defaults.
pub fn load_config(path: &Path) -> Result<DictConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => parse_config(&text, path),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(DictConfig::default())
        }
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
