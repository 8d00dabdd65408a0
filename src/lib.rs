//! krypton-bot - a Discord bot scaffold with loadable command extensions

pub mod application;
pub mod domain;
pub mod extensions;
pub mod infrastructure;
