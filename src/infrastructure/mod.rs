//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Logging: Console and file sinks
//! - Extensions: Extension catalog, descriptors and directory loader
//! - Adapters: Platform integrations (Discord, console)

pub mod config;
pub mod logging;
pub mod extensions;
pub mod adapters;
