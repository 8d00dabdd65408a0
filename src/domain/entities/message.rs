use super::{PermissionSet, User};
use chrono::{DateTime, Utc};

/// The guild (server) a message was sent in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: String,
    pub name: String,
}

impl Guild {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// An inbound chat message, already resolved by the session adapter.
///
/// Permissions are the effective permissions in `channel_id`: the author's
/// for user checks and the bot's own for bot checks. Direct messages carry
/// [`PermissionSet::direct_message`] for both.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub guild: Option<Guild>,
    pub author: User,
    pub content: String,
    pub author_permissions: PermissionSet,
    pub bot_permissions: PermissionSet,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(channel_id: impl Into<String>, author: User, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            channel_id: channel_id.into(),
            guild: None,
            author,
            content: content.into(),
            author_permissions: PermissionSet::direct_message(),
            bot_permissions: PermissionSet::direct_message(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn in_guild(mut self, guild: Guild) -> Self {
        self.guild = Some(guild);
        self
    }

    pub fn with_author_permissions(mut self, permissions: PermissionSet) -> Self {
        self.author_permissions = permissions;
        self
    }

    pub fn with_bot_permissions(mut self, permissions: PermissionSet) -> Self {
        self.bot_permissions = permissions;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn is_direct(&self) -> bool {
        self.guild.is_none()
    }

    /// Where the message came from, as written in log lines
    pub fn origin(&self) -> &str {
        self.guild.as_ref().map(|g| g.name.as_str()).unwrap_or("DMs")
    }
}
