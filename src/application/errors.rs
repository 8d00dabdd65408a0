//! Application layer errors

use std::time::Duration;
use thiserror::Error;

use crate::domain::entities::Permission;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Extension error: {0}")]
    Extension(#[from] ExtensionError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors.
///
/// The first five variants are the conditions answered with a reply; the rest
/// pass through to the top-level handler.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("You are on cooldown. Try again in {:.2}s", .retry_after.as_secs_f64())]
    Cooldown { retry_after: Duration },

    #[error("You do not own this bot.")]
    NotOwner,

    #[error("You are missing {} permission(s) to run this command.", .0.len())]
    MissingPermissions(Vec<Permission>),

    #[error("Bot requires {} permission(s) to run this command.", .0.len())]
    BotMissingPermissions(Vec<Permission>),

    #[error("{param} is a required argument that is missing.")]
    MissingRequiredArgument { param: String },

    #[error("Command \"{0}\" is not found")]
    NotFound(String),

    #[error("This command cannot be used in private messages.")]
    NoPrivateMessage,

    #[error("Bad argument: {0}")]
    BadArgument(String),

    #[error("Command raised an exception: {0}")]
    ExecutionFailed(String),
}

/// Extension loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtensionError {
    #[error("Extension '{0}' could not be found")]
    NotFound(String),

    #[error("Extension '{0}' is already loaded")]
    AlreadyLoaded(String),

    #[error("Extension '{extension}' registers '{command}', which is already taken")]
    DuplicateCommand { extension: String, command: String },

    #[error("Invalid descriptor: {0}")]
    Descriptor(String),

    #[error("Extension setup failed: {0}")]
    Setup(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
