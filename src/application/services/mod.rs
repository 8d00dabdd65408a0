//! Application services - Command dispatch and background tasks

pub mod command_service;
pub mod cooldown;
pub mod error_handler;
pub mod presence;

pub use command_service::CommandService;
pub use cooldown::CooldownTracker;
pub use error_handler::{classify, Disposition};
pub use presence::PresenceRotator;
