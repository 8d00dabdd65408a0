//! Discord adapter - gateway session backed by serenity

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::all::{
    ActivityData, ChannelId, Client, Context, CreateEmbed, CreateMessage, EventHandler,
    GatewayIntents, GuildId, Http, Message as GatewayMessage, Permissions, Ready, ShardMessenger,
    UserId,
};

use crate::application::context::BotContext;
use crate::application::errors::BotError;
use crate::application::services::{CommandService, PresenceRotator};
use crate::domain::entities::{Embed, Guild, Message, Permission, PermissionSet, User};
use crate::domain::traits::Session;

/// Gateway flag for each permission commands can ask for
const PERMISSION_FLAGS: [(Permissions, Permission); 16] = [
    (Permissions::ADMINISTRATOR, Permission::Administrator),
    (Permissions::VIEW_CHANNEL, Permission::ViewChannel),
    (Permissions::SEND_MESSAGES, Permission::SendMessages),
    (Permissions::EMBED_LINKS, Permission::EmbedLinks),
    (Permissions::ATTACH_FILES, Permission::AttachFiles),
    (Permissions::ADD_REACTIONS, Permission::AddReactions),
    (Permissions::READ_MESSAGE_HISTORY, Permission::ReadMessageHistory),
    (Permissions::MENTION_EVERYONE, Permission::MentionEveryone),
    (Permissions::MANAGE_MESSAGES, Permission::ManageMessages),
    (Permissions::MANAGE_CHANNELS, Permission::ManageChannels),
    (Permissions::MANAGE_ROLES, Permission::ManageRoles),
    (Permissions::MANAGE_NICKNAMES, Permission::ManageNicknames),
    (Permissions::MANAGE_GUILD, Permission::ManageGuild),
    (Permissions::KICK_MEMBERS, Permission::KickMembers),
    (Permissions::BAN_MEMBERS, Permission::BanMembers),
    (Permissions::MODERATE_MEMBERS, Permission::ModerateMembers),
];

/// Translate gateway permission bits into the domain set
pub fn permission_set(permissions: Permissions) -> PermissionSet {
    PERMISSION_FLAGS
        .iter()
        .filter(|(flag, _)| permissions.contains(*flag))
        .map(|(_, permission)| *permission)
        .collect()
}

/// Parse a textual snowflake; zero is not a valid id
fn snowflake(id: &str) -> Result<u64, BotError> {
    match id.parse::<u64>() {
        Ok(0) | Err(_) => Err(BotError::Internal(format!("Invalid Discord id: {}", id))),
        Ok(value) => Ok(value),
    }
}

fn network(e: serenity::Error) -> BotError {
    BotError::Network(e.to_string())
}

/// Outbound side of the gateway connection
pub struct DiscordSession {
    http: Arc<Http>,
    shard: RwLock<Option<ShardMessenger>>,
}

impl DiscordSession {
    pub fn new(http: Arc<Http>) -> Self {
        Self {
            http,
            shard: RwLock::new(None),
        }
    }

    /// Presence updates go through the shard, which only exists once connected
    fn attach(&self, shard: ShardMessenger) {
        if let Ok(mut current) = self.shard.write() {
            *current = Some(shard);
        }
    }

    fn shard(&self) -> Option<ShardMessenger> {
        self.shard.read().ok().and_then(|shard| shard.clone())
    }
}

#[async_trait]
impl Session for DiscordSession {
    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<(), BotError> {
        let mut builder = CreateEmbed::new()
            .description(embed.description.clone())
            .colour(embed.color);
        if let Some(title) = &embed.title {
            builder = builder.title(title.clone());
        }

        ChannelId::new(snowflake(channel_id)?)
            .send_message(&*self.http, CreateMessage::new().embed(builder))
            .await
            .map_err(network)?;
        Ok(())
    }

    async fn send_text(&self, channel_id: &str, text: &str) -> Result<(), BotError> {
        ChannelId::new(snowflake(channel_id)?)
            .say(&*self.http, text)
            .await
            .map_err(network)?;
        Ok(())
    }

    async fn set_activity(&self, status: &str) -> Result<(), BotError> {
        let shard = self
            .shard()
            .ok_or_else(|| BotError::Network("Gateway shard not connected".to_string()))?;
        shard.set_activity(Some(ActivityData::playing(status)));
        Ok(())
    }

    async fn kick_member(&self, guild_id: &str, user_id: &str, reason: Option<&str>) -> Result<(), BotError> {
        let guild = GuildId::new(snowflake(guild_id)?);
        let user = UserId::new(snowflake(user_id)?);
        match reason {
            Some(reason) => guild.kick_with_reason(&*self.http, user, reason).await,
            None => guild.kick(&*self.http, user).await,
        }
        .map_err(network)
    }

    async fn ban_member(&self, guild_id: &str, user_id: &str, reason: Option<&str>) -> Result<(), BotError> {
        let guild = GuildId::new(snowflake(guild_id)?);
        let user = UserId::new(snowflake(user_id)?);
        match reason {
            Some(reason) => guild.ban_with_reason(&*self.http, user, 0, reason).await,
            None => guild.ban(&*self.http, user, 0).await,
        }
        .map_err(network)
    }
}

/// Inbound side: gateway events feed the command runtime
struct DiscordHandler {
    runtime: Arc<CommandService>,
    session: Arc<DiscordSession>,
}

impl DiscordHandler {
    async fn translate(&self, ctx: &Context, msg: &GatewayMessage) -> Message {
        let mut author = User::new(msg.author.id.to_string()).with_username(msg.author.name.clone());
        if let Some(name) = &msg.author.global_name {
            author = author.with_global_name(name.clone());
        }
        if msg.author.bot {
            author = author.bot();
        }

        let sent_at = DateTime::parse_from_rfc3339(&msg.timestamp.to_string())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        let message = Message::new(msg.channel_id.to_string(), author, msg.content.clone())
            .with_id(msg.id.to_string())
            .with_timestamp(sent_at);

        let Some(guild_id) = msg.guild_id else {
            return message;
        };

        let name = ctx
            .cache
            .guild(guild_id)
            .map(|guild| guild.name.clone())
            .unwrap_or_else(|| guild_id.to_string());
        let bot_id = ctx.cache.current_user().id;

        let author_permissions = channel_permissions(ctx, guild_id, msg.channel_id, msg.author.id).await;
        let bot_permissions = channel_permissions(ctx, guild_id, msg.channel_id, bot_id).await;

        message
            .in_guild(Guild::new(guild_id.to_string(), name))
            .with_author_permissions(author_permissions)
            .with_bot_permissions(bot_permissions)
    }
}

/// Effective permissions of `user_id` in the channel, resolving threads to
/// their parent. Anything unresolvable counts as no permissions.
async fn channel_permissions(
    ctx: &Context,
    guild_id: GuildId,
    channel_id: ChannelId,
    user_id: UserId,
) -> PermissionSet {
    let member = match guild_id.member(ctx, user_id).await {
        Ok(member) => member,
        Err(e) => {
            tracing::warn!("Failed to fetch member {} in {}: {}", user_id, guild_id, e);
            return PermissionSet::empty();
        }
    };

    let Some(guild) = ctx.cache.guild(guild_id) else {
        return PermissionSet::empty();
    };
    let channel = guild.channels.get(&channel_id).or_else(|| {
        guild
            .threads
            .iter()
            .find(|thread| thread.id == channel_id)
            .and_then(|thread| thread.parent_id)
            .and_then(|parent| guild.channels.get(&parent))
    });

    match channel {
        Some(channel) => permission_set(guild.user_permissions_in(channel, &member)),
        None => PermissionSet::empty(),
    }
}

#[serenity::async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!("Logged in as {}", ready.user.name);
        self.session.attach(ctx.shard.clone());

        let context = self.runtime.context();
        match ctx.http.get_current_application_info().await {
            Ok(info) => {
                if let Some(owner) = info.owner {
                    context.add_owner(owner.id.to_string());
                }
            }
            Err(e) => tracing::warn!("Failed to fetch application owner: {}", e),
        }

        context.mark_ready(
            User::new(ready.user.id.to_string())
                .with_username(ready.user.name.clone())
                .bot(),
        );
    }

    async fn message(&self, ctx: Context, msg: GatewayMessage) {
        if msg.author.bot {
            return;
        }
        let message = self.translate(&ctx, &msg).await;
        self.runtime
            .handle_message(self.session.as_ref(), &message)
            .await;
    }
}

/// Connect to the gateway and serve until shutdown is requested or Ctrl-C
pub async fn run(token: &str, runtime: Arc<CommandService>, rotator: PresenceRotator) -> Result<(), BotError> {
    let context: Arc<BotContext> = runtime.context().clone();
    let session = Arc::new(DiscordSession::new(Arc::new(Http::new(token))));
    let handler = DiscordHandler {
        runtime,
        session: session.clone(),
    };

    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(token, intents)
        .event_handler(handler)
        .await
        .map_err(network)?;

    let presence = rotator.spawn(session.clone(), &context);

    let shard_manager = client.shard_manager.clone();
    let watcher_context = context.clone();
    let mut shutdown = context.shutdown_signal();
    tokio::spawn(async move {
        tokio::select! {
            _ = async { shutdown.wait_for(|set| *set).await.map(|_| ()) } => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl-C");
                watcher_context.request_shutdown();
            }
        }
        shard_manager.shutdown_all().await;
    });

    tracing::info!("Connecting to Discord");
    let result = client.start().await.map_err(network);

    context.request_shutdown();
    if let Err(e) = presence.await {
        tracing::warn!("Presence task ended abnormally: {}", e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_set_from_flags() {
        let set = permission_set(Permissions::KICK_MEMBERS | Permissions::SEND_MESSAGES);
        assert!(set.contains(Permission::KickMembers));
        assert!(set.contains(Permission::SendMessages));
        assert!(!set.contains(Permission::BanMembers));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_administrator_flag() {
        let set = permission_set(Permissions::ADMINISTRATOR);
        assert!(set.contains(Permission::ModerateMembers));
    }

    #[test]
    fn test_every_permission_has_a_flag() {
        assert_eq!(permission_set(Permissions::all()).len(), Permission::ALL.len());
    }

    #[test]
    fn test_snowflake() {
        assert_eq!(snowflake("123").unwrap(), 123);
        assert!(snowflake("0").is_err());
        assert!(snowflake("abc").is_err());
    }
}
