//! Extension catalog - Compiled-in identifier to constructor mapping

use std::collections::BTreeMap;

use crate::application::errors::ExtensionError;
use crate::extensions::{self, Extension, ExtensionConstructor};

/// Every extension the binary knows how to build, by identifier
#[derive(Default)]
pub struct ExtensionCatalog {
    entries: BTreeMap<String, ExtensionConstructor>,
}

impl ExtensionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The extensions shipped with the bot
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        let builtins: [(&str, ExtensionConstructor); 4] = [
            ("general", extensions::general::create),
            ("fun", extensions::fun::create),
            ("moderation", extensions::moderation::create),
            ("owner", extensions::owner::create),
        ];
        for (id, constructor) in builtins {
            catalog.entries.insert(id.to_string(), constructor);
        }
        catalog
    }

    /// Add an extension under `id`
    pub fn register(&mut self, id: impl Into<String>, constructor: ExtensionConstructor) -> Result<(), ExtensionError> {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return Err(ExtensionError::AlreadyLoaded(id));
        }
        self.entries.insert(id, constructor);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Build a fresh instance of the extension
    pub fn create(&self, id: &str) -> Result<Box<dyn Extension>, ExtensionError> {
        self.entries
            .get(id)
            .map(|constructor| constructor())
            .ok_or_else(|| ExtensionError::NotFound(id.to_string()))
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
