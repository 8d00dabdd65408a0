//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;

use krypton_bot::application::errors::BotError;
use krypton_bot::domain::entities::{Embed, Guild, Message, PermissionSet, User};
use krypton_bot::domain::traits::Session;

static INIT: Once = Once::new();

/// Route log output through the test harness; `RUST_LOG` picks the level
pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub const BOT_ID: &str = "900";
pub const OWNER_ID: &str = "100";
pub const MEMBER_ID: &str = "200";
pub const GUILD_ID: &str = "500";
pub const CHANNEL_ID: &str = "700";

/// Everything a session was asked to do, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Embed { channel_id: String, embed: Embed },
    Text { channel_id: String, text: String },
    Activity(String),
    Kick { guild_id: String, user_id: String, reason: Option<String> },
    Ban { guild_id: String, user_id: String, reason: Option<String> },
    /// Marker pushed by tests themselves
    Note(&'static str),
}

/// Session double that records calls instead of talking to a platform
#[derive(Clone, Default)]
pub struct RecordingSession {
    log: Arc<Mutex<Vec<Sent>>>,
    reject_moderation: bool,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kicks and bans fail the way the platform refuses them over role order
    pub fn rejecting_moderation() -> Self {
        Self {
            reject_moderation: true,
            ..Self::default()
        }
    }

    fn moderate(&self, sent: Sent) -> Result<(), BotError> {
        if self.reject_moderation {
            return Err(BotError::Network("Missing Permissions (role hierarchy)".to_string()));
        }
        self.push(sent);
        Ok(())
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.log.lock().unwrap().clone()
    }

    pub fn note(&self, marker: &'static str) {
        self.log.lock().unwrap().push(Sent::Note(marker));
    }

    pub fn embeds(&self) -> Vec<Embed> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Embed { embed, .. } => Some(embed),
                _ => None,
            })
            .collect()
    }

    pub fn activities(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Activity(status) => Some(status),
                _ => None,
            })
            .collect()
    }

    fn push(&self, sent: Sent) {
        self.log.lock().unwrap().push(sent);
    }
}

#[async_trait]
impl Session for RecordingSession {
    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<(), BotError> {
        self.push(Sent::Embed {
            channel_id: channel_id.to_string(),
            embed: embed.clone(),
        });
        Ok(())
    }

    async fn send_text(&self, channel_id: &str, text: &str) -> Result<(), BotError> {
        self.push(Sent::Text {
            channel_id: channel_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn set_activity(&self, status: &str) -> Result<(), BotError> {
        self.push(Sent::Activity(status.to_string()));
        Ok(())
    }

    async fn kick_member(&self, guild_id: &str, user_id: &str, reason: Option<&str>) -> Result<(), BotError> {
        self.moderate(Sent::Kick {
            guild_id: guild_id.to_string(),
            user_id: user_id.to_string(),
            reason: reason.map(str::to_string),
        })
    }

    async fn ban_member(&self, guild_id: &str, user_id: &str, reason: Option<&str>) -> Result<(), BotError> {
        self.moderate(Sent::Ban {
            guild_id: guild_id.to_string(),
            user_id: user_id.to_string(),
            reason: reason.map(str::to_string),
        })
    }
}

pub fn bot_user() -> User {
    User::new(BOT_ID).with_username("krypton").bot()
}

/// Direct message from `author_id`
pub fn direct(author_id: &str, content: &str) -> Message {
    Message::new(CHANNEL_ID, User::new(author_id).with_username("tester"), content)
}

/// Guild message with explicit caller and bot permissions
pub fn in_guild(
    author_id: &str,
    content: &str,
    author_permissions: PermissionSet,
    bot_permissions: PermissionSet,
) -> Message {
    direct(author_id, content)
        .in_guild(Guild::new(GUILD_ID, "Test Guild"))
        .with_author_permissions(author_permissions)
        .with_bot_permissions(bot_permissions)
}
