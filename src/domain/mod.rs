//! Domain layer - Core bot objects with no platform dependencies
//! 
//! This layer contains:
//! - Entities: Users, messages, commands, embeds, permissions
//! - Traits: Abstractions for infrastructure (Session)

pub mod entities;
pub mod traits;
