//! Console adapter for development/testing
//!
//! Each stdin line becomes a direct message from a local user who is treated
//! as an owner. Replies are printed instead of sent.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::errors::BotError;
use crate::application::services::{CommandService, PresenceRotator};
use crate::domain::entities::{Embed, Message, User};
use crate::domain::traits::Session;

pub const CONSOLE_CHANNEL: &str = "console";
pub const CONSOLE_USER_ID: &str = "1";
pub const CONSOLE_BOT_ID: &str = "2";

/// Prints everything the bot would send
#[derive(Debug, Default)]
pub struct ConsoleSession;

impl ConsoleSession {
    pub fn new() -> Self {
        Self
    }
}

/// Plain-text rendering of an embed for the terminal
pub fn render_embed(embed: &Embed) -> String {
    match &embed.title {
        Some(title) => format!("[BOT] [#{:06X}] {}\n      {}", embed.color, title, embed.description),
        None => format!("[BOT] [#{:06X}] {}", embed.color, embed.description),
    }
}

#[async_trait]
impl Session for ConsoleSession {
    async fn send_embed(&self, _channel_id: &str, embed: &Embed) -> Result<(), BotError> {
        println!("{}", render_embed(embed));
        Ok(())
    }

    async fn send_text(&self, _channel_id: &str, text: &str) -> Result<(), BotError> {
        println!("[BOT] {}", text);
        Ok(())
    }

    async fn set_activity(&self, status: &str) -> Result<(), BotError> {
        tracing::info!("Status changed to 'Playing {}'", status);
        Ok(())
    }

    async fn kick_member(&self, _guild_id: &str, user_id: &str, reason: Option<&str>) -> Result<(), BotError> {
        println!("[MOD] kick {} ({})", user_id, reason.unwrap_or("no reason"));
        Ok(())
    }

    async fn ban_member(&self, _guild_id: &str, user_id: &str, reason: Option<&str>) -> Result<(), BotError> {
        println!("[MOD] ban {} ({})", user_id, reason.unwrap_or("no reason"));
        Ok(())
    }
}

/// Read commands from stdin until EOF or a shutdown request
pub async fn run(runtime: Arc<CommandService>, rotator: PresenceRotator) -> Result<(), BotError> {
    tracing::info!("Starting console bot (dev mode)");
    let context = runtime.context().clone();
    let session = Arc::new(ConsoleSession::new());

    context.add_owner(CONSOLE_USER_ID);
    let presence = rotator.spawn(session.clone(), &context);
    context.mark_ready(User::new(CONSOLE_BOT_ID).with_username("krypton").bot());

    println!("Type commands with the '{}' prefix, Ctrl-D to quit.", runtime.prefix());

    let author = User::new(CONSOLE_USER_ID).with_username("console");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shutdown = context.shutdown_signal();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = async { shutdown.wait_for(|set| *set).await.map(|_| ()) } => break,
        };
        let Some(line) = line else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let message = Message::new(CONSOLE_CHANNEL, author.clone(), line);
        runtime.handle_message(session.as_ref(), &message).await;
    }

    context.request_shutdown();
    if let Err(e) = presence.await {
        tracing::warn!("Presence task ended abnormally: {}", e);
    }
    Ok(())
}
