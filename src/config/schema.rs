//! YAML schema for the service configuration
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration for the bundled cardiovascular-risk model.

use crate::preprocess::ColumnSpec;
use crate::server::ServerConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Serialized classifier (json or yaml)
    pub model_path: PathBuf,

    /// Reference CSV used to fit the preprocessor
    pub dataset_path: PathBuf,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Column partition; must match the one the model was trained with
    pub columns: ColumnSpec,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/model.json"),
            dataset_path: PathBuf::from("./data/dataset.csv"),
            server: ServerConfig::default(),
            columns: ColumnSpec::cardio(),
        }
    }
}

impl AppConfig {
    /// Parse a configuration from YAML text
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to an empty mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_yaml(&content)
            .map_err(|e| Error::Config { path: path.to_path_buf(), message: e.to_string() })?;
        config.columns.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise fall back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
