//! Session adapters: the real gateway and a local console for development

pub mod console;
pub mod discord;
