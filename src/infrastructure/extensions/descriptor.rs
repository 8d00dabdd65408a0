//! Extension descriptor - The `<id>.yaml` file that marks an extension for loading

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::application::errors::ExtensionError;

/// Per-extension settings. An empty file means "load with defaults".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExtensionDescriptor {
    /// Set to false to keep the file around without loading the extension
    pub enabled: bool,

    /// Free-form note for whoever maintains the directory
    pub description: Option<String>,
}

impl Default for ExtensionDescriptor {
    fn default() -> Self {
        Self {
            enabled: true,
            description: None,
        }
    }
}

impl ExtensionDescriptor {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ExtensionError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ExtensionError::Descriptor(format!("Failed to read descriptor: {}", e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ExtensionError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| ExtensionError::Descriptor(format!("Failed to parse descriptor: {}", e)))
    }
}
