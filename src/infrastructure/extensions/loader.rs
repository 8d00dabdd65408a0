//! Extension loader - Scans the extension directory and installs each module

use std::fs::ReadDir;
use std::path::{Path, PathBuf};

use super::catalog::ExtensionCatalog;
use super::descriptor::ExtensionDescriptor;
use crate::application::errors::ExtensionError;
use crate::domain::entities::CommandRegistry;

/// File suffix that marks an extension descriptor
pub const EXTENSION_SUFFIX: &str = "yaml";

/// Result of trying to load one extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// Descriptor says `enabled: false`
    Skipped,
    Failed(ExtensionError),
}

/// One (identifier, outcome) record from a startup scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub identifier: String,
    pub outcome: LoadOutcome,
}

impl LoadReport {
    pub fn is_loaded(&self) -> bool {
        self.outcome == LoadOutcome::Loaded
    }
}

/// Lazy walk over the extension directory yielding identifiers.
///
/// Entries are read one at a time as the iterator advances; scanning again
/// means calling [`ExtensionLoader::scan`] again.
pub struct ExtensionScan {
    entries: Option<ReadDir>,
}

impl Iterator for ExtensionScan {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let entries = self.entries.as_mut()?;
        for entry in entries.by_ref() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(identifier) = identifier_of(&path) {
                return Some(identifier);
            }
        }
        None
    }
}

/// `general.yaml` -> `general`; hidden files and other suffixes are skipped
fn identifier_of(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION_SUFFIX) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() || stem.starts_with('.') {
        return None;
    }
    Some(stem.to_string())
}

/// Extension loader
pub struct ExtensionLoader {
    directory: PathBuf,
    catalog: ExtensionCatalog,
}

impl ExtensionLoader {
    pub fn new(directory: impl Into<PathBuf>, catalog: ExtensionCatalog) -> Self {
        Self {
            directory: directory.into(),
            catalog,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Enumerate candidate identifiers. A missing directory yields nothing.
    pub fn scan(&self) -> ExtensionScan {
        let entries = match std::fs::read_dir(&self.directory) {
            Ok(entries) => Some(entries),
            Err(e) => {
                tracing::warn!(
                    "Cannot read extension directory {}: {}",
                    self.directory.display(),
                    e
                );
                None
            }
        };
        ExtensionScan { entries }
    }

    /// Load a single extension into the command table
    pub fn load(&self, identifier: &str, registry: &mut CommandRegistry) -> Result<LoadOutcome, ExtensionError> {
        if registry.is_extension_loaded(identifier) {
            return Err(ExtensionError::AlreadyLoaded(identifier.to_string()));
        }

        let descriptor_path = self
            .directory
            .join(format!("{}.{}", identifier, EXTENSION_SUFFIX));
        let descriptor = ExtensionDescriptor::from_file(&descriptor_path)?;
        if !descriptor.enabled {
            return Ok(LoadOutcome::Skipped);
        }

        let extension = self.catalog.create(identifier)?;
        let commands = extension.commands()?;
        registry.install(identifier, commands)?;
        Ok(LoadOutcome::Loaded)
    }

    /// Load everything the scan finds. A failing extension is logged and the
    /// scan continues with the next one.
    pub fn load_all(&self, registry: &mut CommandRegistry) -> Vec<LoadReport> {
        let mut reports = Vec::new();

        for identifier in self.scan() {
            let outcome = match self.load(&identifier, registry) {
                Ok(LoadOutcome::Loaded) => {
                    tracing::info!("Loaded extension '{}'", identifier);
                    LoadOutcome::Loaded
                }
                Ok(LoadOutcome::Skipped) => {
                    tracing::info!("Skipped disabled extension '{}'", identifier);
                    LoadOutcome::Skipped
                }
                Ok(LoadOutcome::Failed(e)) | Err(e) => {
                    tracing::error!("Failed to load extension {}: {}", identifier, e);
                    LoadOutcome::Failed(e)
                }
            };
            reports.push(LoadReport { identifier, outcome });
        }

        reports
    }
}
