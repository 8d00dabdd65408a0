//! Domain entities - Core bot objects with no platform dependencies

pub mod user;
pub mod message;
pub mod command;
pub mod embed;
pub mod permission;

pub use user::User;
pub use message::{Guild, Message};
pub use command::{Action, Command, CommandHandler, CommandRegistry, Cooldown, Param, Response};
pub use embed::{Embed, Reply, DEFAULT_COLOR, ERROR_COLOR};
pub use permission::{Permission, PermissionSet};
