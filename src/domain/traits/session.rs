use async_trait::async_trait;
use crate::domain::entities::{Embed, Reply};
use crate::application::errors::BotError;

/// Session trait - the outbound boundary to the messaging platform.
///
/// Everything the bot sends goes through here; transport, reconnects and
/// rate limits stay inside the implementation's client library.
#[async_trait]
pub trait Session: Send + Sync {
    /// Send a rich reply to a channel
    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<(), BotError>;

    /// Send a plain text message to a channel
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<(), BotError>;

    /// Replace the "Playing ..." activity shown next to the bot
    async fn set_activity(&self, status: &str) -> Result<(), BotError>;

    async fn kick_member(&self, guild_id: &str, user_id: &str, reason: Option<&str>) -> Result<(), BotError>;

    async fn ban_member(&self, guild_id: &str, user_id: &str, reason: Option<&str>) -> Result<(), BotError>;

    async fn reply(&self, channel_id: &str, reply: &Reply) -> Result<(), BotError> {
        match reply {
            Reply::Text(text) => self.send_text(channel_id, text).await,
            Reply::Embed(embed) => self.send_embed(channel_id, embed).await,
        }
    }
}
