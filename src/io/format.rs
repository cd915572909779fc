//! Model artifact formats

use serde::{Deserialize, Serialize};

/// Supported model artifact formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelFormat {
    /// JSON document
    Json,
    /// YAML document
    Yaml,
}

impl ModelFormat {
    /// Detect the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Canonical file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Options for writing a model artifact
#[derive(Debug, Clone)]
pub struct SaveConfig {
    /// Output format
    pub format: ModelFormat,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl SaveConfig {
    /// Create a save config for `format`, pretty-printed
    pub fn new(format: ModelFormat) -> Self {
        Self { format, pretty: true }
    }

    /// Toggle pretty-printing
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}
