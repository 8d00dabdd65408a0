//! Configuration management
//!
//! Settings come from the process environment, optionally seeded from a
//! `.env` file of `KEY=value` lines.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::application::errors::ConfigError;

/// Template written by `init-config`
pub const ENV_TEMPLATE: &str = "\
# Bot token from the developer portal (required)
TOKEN=
# Command prefix
PREFIX=!
# Link shown by the invite command
INVITE_LINK=
# Comma-separated user ids allowed to run owner commands
OWNERS=
# Directory holding one <extension>.yaml per extension to load
EXTENSIONS_DIR=extensions
LOG_FILE=discord.log
STATUS_INTERVAL_SECS=60
";

/// Bot configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub token: Option<String>,
    pub prefix: String,
    pub invite_link: Option<String>,
    pub owners: Vec<String>,
    pub extensions_dir: PathBuf,
    pub log_file: PathBuf,
    pub status_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            prefix: "!".to_string(),
            invite_link: None,
            owners: Vec::new(),
            extensions_dir: PathBuf::from("extensions"),
            log_file: PathBuf::from("discord.log"),
            status_interval: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Load `.env` (if any) into the environment, then read the environment.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        load_dotenv(env_file)?;
        Self::load_env()
    }

    pub fn load_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Config::default();

        config.token = get("TOKEN");

        if let Some(prefix) = get("PREFIX") {
            config.prefix = prefix;
        }

        config.invite_link = get("INVITE_LINK");

        if let Some(owners) = get("OWNERS") {
            config.owners = parse_owners(&owners)?;
        }

        if let Some(dir) = get("EXTENSIONS_DIR") {
            config.extensions_dir = PathBuf::from(dir);
        }

        if let Some(file) = get("LOG_FILE") {
            config.log_file = PathBuf::from(file);
        }

        if let Some(secs) = get("STATUS_INTERVAL_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("STATUS_INTERVAL_SECS={}", secs)))?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue("STATUS_INTERVAL_SECS must be positive".to_string()));
            }
            config.status_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        if token.is_some() {
            self.token = token;
        }
        self
    }

    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField("TOKEN".to_string()))
    }
}

fn parse_owners(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            if id.chars().all(|c| c.is_ascii_digit()) {
                Ok(id.to_string())
            } else {
                Err(ConfigError::InvalidValue(format!("owner id '{}'", id)))
            }
        })
        .collect()
}

/// A missing `.env` is fine; a malformed one is not.
fn load_dotenv(path: Option<&Path>) -> Result<(), ConfigError> {
    let result = match path {
        Some(path) => dotenvy::from_path(path).map(|_| ()),
        None => dotenvy::dotenv().map(|_| ()),
    };
    match result {
        Err(e) if !e.not_found() => Err(ConfigError::Parse(e.to_string())),
        _ => Ok(()),
    }
}
