//! Extension trait definitions

use crate::application::errors::ExtensionError;
use crate::domain::entities::Command;

/// A self-contained command module.
///
/// Extensions are compiled in and looked up by identifier; `commands` is the
/// setup step and runs once per load.
pub trait Extension: Send + Sync {
    /// Identifier the extension is loaded under
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// Build the commands this extension contributes
    fn commands(&self) -> Result<Vec<Command>, ExtensionError>;
}

/// Constructor stored in the catalog
pub type ExtensionConstructor = fn() -> Box<dyn Extension>;
