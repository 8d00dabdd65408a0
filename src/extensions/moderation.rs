//! Moderation commands. Caller and bot both need the matching permission.

use std::time::Duration;

use super::trait_def::Extension;
use crate::application::context::CommandContext;
use crate::application::errors::{CommandError, ExtensionError};
use crate::application::messaging::parse_user_mention;
use crate::domain::entities::{Action, Command, Cooldown, Embed, Param, Permission, Response, User};

pub struct Moderation;

impl Extension for Moderation {
    fn name(&self) -> &str {
        "moderation"
    }

    fn description(&self) -> &str {
        "Kick and ban members"
    }

    fn commands(&self) -> Result<Vec<Command>, ExtensionError> {
        Ok(vec![kick(), ban()])
    }
}

pub fn create() -> Box<dyn Extension> {
    Box::new(Moderation)
}

fn kick() -> Command {
    Command::new("kick")
        .with_description("Kick a user out of the server.")
        .with_param(Param::required("user"))
        .with_param(Param::optional("reason"))
        .guild_only()
        .with_permission(Permission::KickMembers)
        .with_bot_permission(Permission::KickMembers)
        .with_cooldown(Cooldown::new(1, Duration::from_secs(5)))
        .with_handler(|ctx| {
            let (user_id, reason) = target(ctx)?;
            let embed = Embed::new(format!(
                "**{}** was kicked by **{}**!\nReason: {}",
                User::new(user_id.clone()).mention(),
                ctx.author(),
                reason.as_deref().unwrap_or("Not specified")
            ));
            Ok(Response::embed(embed).with_action(Action::Kick { user_id, reason }))
        })
}

fn ban() -> Command {
    Command::new("ban")
        .with_description("Bans a user from the server.")
        .with_param(Param::required("user"))
        .with_param(Param::optional("reason"))
        .guild_only()
        .with_permission(Permission::BanMembers)
        .with_bot_permission(Permission::BanMembers)
        .with_cooldown(Cooldown::new(1, Duration::from_secs(5)))
        .with_handler(|ctx| {
            let (user_id, reason) = target(ctx)?;
            let embed = Embed::new(format!(
                "**{}** was banned by **{}**!\nReason: {}",
                User::new(user_id.clone()).mention(),
                ctx.author(),
                reason.as_deref().unwrap_or("Not specified")
            ));
            Ok(Response::embed(embed).with_action(Action::Ban { user_id, reason }))
        })
}

/// Member to act on plus the optional reason
fn target(ctx: &CommandContext<'_>) -> Result<(String, Option<String>), CommandError> {
    let raw = ctx.arg(0).unwrap_or_default();
    let user_id = parse_user_mention(raw)
        .ok_or_else(|| CommandError::BadArgument(format!("Member \"{}\" not found.", raw)))?;

    if user_id == ctx.author().id {
        return Err(CommandError::BadArgument("You cannot do that to yourself.".to_string()));
    }
    if ctx.bot.current_user().map(|me| me.id == user_id).unwrap_or(false) {
        return Err(CommandError::BadArgument("I will not do that to myself.".to_string()));
    }
    Ok((user_id, ctx.rest(1)))
}
