use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::application::context::{BotContext, CommandContext};
use crate::application::errors::{BotError, CommandError};
use crate::application::messaging::{CommandParser, Invocation};
use crate::application::services::cooldown::CooldownTracker;
use crate::application::services::error_handler::{classify, Disposition};
use crate::domain::entities::{Action, Command, CommandRegistry, Embed, Message, Response};
use crate::domain::traits::Session;

const KICK_FAILED: &str = "An error occurred while trying to kick the user. Make sure my role is above the role of the user you want to kick.";
const BAN_FAILED: &str = "An error occurred while trying to ban the user. Make sure my role is above the role of the user you want to ban.";

/// Command runtime: parses inbound messages, runs checks and handlers, and
/// answers failures through the error classifier.
pub struct CommandService {
    registry: CommandRegistry,
    parser: CommandParser,
    cooldowns: CooldownTracker,
    context: Arc<BotContext>,
}

impl CommandService {
    pub fn new(registry: CommandRegistry, context: Arc<BotContext>) -> Self {
        Self {
            parser: CommandParser::new(context.prefix()),
            registry,
            cooldowns: CooldownTracker::new(),
            context,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn context(&self) -> &Arc<BotContext> {
        &self.context
    }

    pub fn prefix(&self) -> &str {
        self.parser.prefix()
    }

    /// Entry point for session adapters: dispatch and log whatever the
    /// classifier did not answer. Never fails.
    pub async fn handle_message(&self, session: &dyn Session, message: &Message) {
        if let Err(e) = self.dispatch(session, message).await {
            error!(
                "Ignoring exception in message {} from {} in {}: {}",
                message.id, message.author, message.origin(), e
            );
        }
    }

    /// Dispatch one message. Unclassified command errors come back as
    /// `Err(BotError::Command(..))` with nothing sent.
    pub async fn dispatch(&self, session: &dyn Session, message: &Message) -> Result<(), BotError> {
        if self.is_ignored(message) {
            return Ok(());
        }

        let bot_id = self.context.current_user().map(|u| u.id);
        let Some(invocation) = self.parser.parse(&message.content, bot_id.as_deref()) else {
            return Ok(());
        };
        // A bare prefix is chatter, not a lookup miss
        if invocation.name.is_empty() {
            return Ok(());
        }
        debug!("Invoking '{}' with args {:?}", invocation.name, invocation.args);

        match self.invoke(message, &invocation) {
            Ok((command, response)) => {
                self.apply(session, message, response).await?;
                self.on_command_completion(command, message);
                Ok(())
            }
            Err(error) => self.on_command_error(session, message, error).await,
        }
    }

    /// Self-authored and bot-authored messages never reach the command table
    fn is_ignored(&self, message: &Message) -> bool {
        if message.author.is_bot {
            return true;
        }
        self.context
            .current_user()
            .map(|me| me.id == message.author.id)
            .unwrap_or(false)
    }

    fn invoke(
        &self,
        message: &Message,
        invocation: &Invocation,
    ) -> Result<(&Command, Response), CommandError> {
        let command = self
            .registry
            .find(&invocation.name)
            .ok_or_else(|| CommandError::NotFound(invocation.name.clone()))?;

        self.check(command, message)?;

        if let Some(cooldown) = &command.cooldown {
            self.cooldowns
                .hit(&command.name, &message.author.id, cooldown)
                .map_err(|retry_after| CommandError::Cooldown { retry_after })?;
        }

        for (index, param) in command.params.iter().enumerate() {
            if param.required && invocation.args.len() <= index {
                return Err(CommandError::MissingRequiredArgument {
                    param: param.name.clone(),
                });
            }
        }

        let Some(handler) = &command.handler else {
            return Ok((command, Response::text(format!("Command {} not implemented", command.name))));
        };

        let ctx = CommandContext {
            message,
            args: &invocation.args,
            invoked_with: &invocation.name,
            bot: &self.context,
            commands: &self.registry,
        };
        Ok((command, handler(&ctx)?))
    }

    fn check(&self, command: &Command, message: &Message) -> Result<(), CommandError> {
        if command.guild_only && message.is_direct() {
            return Err(CommandError::NoPrivateMessage);
        }
        if command.owner_only && !self.context.is_owner(&message.author.id) {
            return Err(CommandError::NotOwner);
        }

        let missing = message.author_permissions.missing(&command.user_permissions);
        if !missing.is_empty() {
            return Err(CommandError::MissingPermissions(missing));
        }

        let missing = message.bot_permissions.missing(&command.bot_permissions);
        if !missing.is_empty() {
            return Err(CommandError::BotMissingPermissions(missing));
        }
        Ok(())
    }

    /// Member actions run first; the reply only goes out once they succeeded,
    /// and shutdown is requested last so the reply is not cut off.
    async fn apply(&self, session: &dyn Session, message: &Message, response: Response) -> Result<(), BotError> {
        let mut shutdown = false;

        for action in response.actions {
            match action {
                Action::Kick { user_id, reason } => {
                    let guild = message.guild.as_ref().ok_or(CommandError::NoPrivateMessage)?;
                    if let Err(e) = session.kick_member(&guild.id, &user_id, reason.as_deref()).await {
                        warn!("Failed to kick {} in {}: {}", user_id, guild.name, e);
                        return session.send_embed(&message.channel_id, &Embed::error(KICK_FAILED)).await;
                    }
                }
                Action::Ban { user_id, reason } => {
                    let guild = message.guild.as_ref().ok_or(CommandError::NoPrivateMessage)?;
                    if let Err(e) = session.ban_member(&guild.id, &user_id, reason.as_deref()).await {
                        warn!("Failed to ban {} in {}: {}", user_id, guild.name, e);
                        return session.send_embed(&message.channel_id, &Embed::error(BAN_FAILED)).await;
                    }
                }
                Action::Shutdown => shutdown = true,
            }
        }

        if let Some(reply) = &response.reply {
            session.reply(&message.channel_id, reply).await?;
        }
        if shutdown {
            self.context.request_shutdown();
        }
        Ok(())
    }

    fn on_command_completion(&self, command: &Command, message: &Message) {
        info!(
            "Executed {} in {} by {}",
            command.qualified_name(),
            message.origin(),
            message.author
        );
    }

    async fn on_command_error(
        &self,
        session: &dyn Session,
        message: &Message,
        error: CommandError,
    ) -> Result<(), BotError> {
        match classify(&error) {
            Disposition::Reply(embed) => session.send_embed(&message.channel_id, &embed).await,
            Disposition::PassThrough => Err(BotError::Command(error)),
        }
    }
}
