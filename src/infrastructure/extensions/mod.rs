//! Extension system for krypton-bot
//! 
//! Extensions are compiled-in command modules looked up by identifier.
//! Each `<identifier>.yaml` descriptor in the extension directory marks one
//! of them for loading at startup.

pub mod catalog;
pub mod descriptor;
pub mod loader;

pub use catalog::ExtensionCatalog;
pub use descriptor::ExtensionDescriptor;
pub use loader::{ExtensionLoader, ExtensionScan, LoadOutcome, LoadReport};
