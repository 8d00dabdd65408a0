//! Everyday commands: help, ping, invite, botinfo, 8ball

use chrono::Utc;
use rand::seq::SliceRandom;

use super::trait_def::Extension;
use crate::application::errors::{CommandError, ExtensionError};
use crate::domain::entities::{Command, Embed, Param, Response, User};

const EIGHT_BALL_ANSWERS: [&str; 20] = [
    "It is certain.",
    "It is decidedly so.",
    "You may rely on it.",
    "Without a doubt.",
    "Yes - definitely.",
    "As I see, yes.",
    "Most likely.",
    "Outlook good.",
    "Yes.",
    "Signs point to yes.",
    "Reply hazy, try again.",
    "Ask again later.",
    "Better not tell you now.",
    "Cannot predict now.",
    "Concentrate and ask again later.",
    "Don't count on it.",
    "My reply is no.",
    "My sources say no.",
    "Outlook not so good.",
    "Very doubtful.",
];

pub struct General;

impl Extension for General {
    fn name(&self) -> &str {
        "general"
    }

    fn description(&self) -> &str {
        "Everyday commands"
    }

    fn commands(&self) -> Result<Vec<Command>, ExtensionError> {
        Ok(vec![help(), ping(), invite(), botinfo(), eight_ball()])
    }
}

pub fn create() -> Box<dyn Extension> {
    Box::new(General)
}

fn help() -> Command {
    Command::new("help")
        .with_description("List all commands the bot has loaded.")
        .with_param(Param::optional("command"))
        .with_handler(|ctx| {
            let prefix = ctx.bot.prefix();

            if let Some(name) = ctx.arg(0) {
                let command = ctx
                    .commands
                    .find(name)
                    .ok_or_else(|| CommandError::BadArgument(format!("No command called '{}'", name)))?;
                let mut description = format!("`{}{}`", prefix, command.signature());
                if let Some(text) = &command.description {
                    description.push_str(&format!("\n{}", text));
                }
                if !command.aliases.is_empty() {
                    description.push_str(&format!("\nAliases: {}", command.aliases.join(", ")));
                }
                return Ok(Response::embed(
                    Embed::new(description).with_title(format!("Help: {}", command.name)),
                ));
            }

            let mut description = String::new();
            for (extension, commands) in ctx.commands.by_extension() {
                description.push_str(&format!("**{}**\n", capitalize_first(extension)));
                for command in commands {
                    description.push_str(&format!(
                        "`{}{}` - {}\n",
                        prefix,
                        command.name,
                        command.description.as_deref().unwrap_or("")
                    ));
                }
            }
            Ok(Response::embed(
                Embed::new(description.trim_end()).with_title("Help"),
            ))
        })
}

fn ping() -> Command {
    Command::new("ping")
        .with_description("Check if the bot is alive.")
        .with_handler(|ctx| {
            let latency = (Utc::now() - ctx.message.timestamp).num_milliseconds().max(0);
            Ok(Response::embed(
                Embed::new(format!("The bot latency is {}ms.", latency)).with_title("🏓 Pong!"),
            ))
        })
}

fn invite() -> Command {
    Command::new("invite")
        .with_description("Get the invite link of the bot to be able to invite it.")
        .with_handler(|ctx| {
            let embed = match ctx.bot.invite_link() {
                Some(link) => Embed::new(format!("Invite me by clicking [here]({}).", link)),
                None => Embed::new("No invite link is configured for this bot."),
            };
            Ok(Response::embed(embed))
        })
}

fn botinfo() -> Command {
    Command::new("botinfo")
        .with_description("Get some useful (or not) information about the bot.")
        .with_handler(|ctx| {
            let owners = ctx.bot.owners();
            let owners = if owners.is_empty() {
                "unknown".to_string()
            } else {
                owners
                    .into_iter()
                    .map(|id| User::new(id).mention())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let uptime = ctx.bot.uptime();
            let description = format!(
                "Owner: {}\nVersion: {}\nPrefix: `{}`\nUptime: {}h {}m {}s\nCommands: {}",
                owners,
                env!("CARGO_PKG_VERSION"),
                ctx.bot.prefix(),
                uptime.num_hours(),
                uptime.num_minutes() % 60,
                uptime.num_seconds() % 60,
                ctx.commands.len()
            );
            Ok(Response::embed(Embed::new(description).with_title("Bot Information")))
        })
}

fn eight_ball() -> Command {
    Command::new("8ball")
        .with_description("Ask any question to the bot.")
        .with_param(Param::required("question"))
        .with_handler(|ctx| {
            let question = ctx.rest(0).unwrap_or_default();
            let answer = EIGHT_BALL_ANSWERS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or("Ask again later.");
            Ok(Response::embed(
                Embed::new(answer).with_title(format!("**Question:** {}", question)),
            ))
        })
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
