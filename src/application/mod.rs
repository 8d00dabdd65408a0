//! Application layer - Use cases and bot behavior
//! 
//! This layer contains:
//! - Context: Process-wide bot state shared with every component
//! - Services: Command runtime, error classifier, presence rotator
//! - Errors: Domain-specific errors
//! - Messaging: Prefix and argument parsing

pub mod context;
pub mod errors;
pub mod services;
pub mod messaging;
