//! Process-wide bot state, constructed once at startup and shared by `Arc`

use std::collections::HashSet;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;

use crate::domain::entities::{CommandRegistry, Message, User};

/// State shared by the command runtime, the presence rotator and the session
/// adapters.
pub struct BotContext {
    prefix: String,
    invite_link: Option<String>,
    owners: RwLock<HashSet<String>>,
    current_user: RwLock<Option<User>>,
    started_at: DateTime<Utc>,
    ready: watch::Sender<bool>,
    shutdown: watch::Sender<bool>,
}

impl BotContext {
    pub fn new(prefix: impl Into<String>) -> Self {
        let (ready, _) = watch::channel(false);
        let (shutdown, _) = watch::channel(false);
        Self {
            prefix: prefix.into(),
            invite_link: None,
            owners: RwLock::new(HashSet::new()),
            current_user: RwLock::new(None),
            started_at: Utc::now(),
            ready,
            shutdown,
        }
    }

    pub fn with_invite_link(mut self, link: Option<String>) -> Self {
        self.invite_link = link;
        self
    }

    pub fn with_owners(self, owners: impl IntoIterator<Item = String>) -> Self {
        for owner in owners {
            self.add_owner(owner);
        }
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn invite_link(&self) -> Option<&str> {
        self.invite_link.as_deref()
    }

    pub fn add_owner(&self, user_id: impl Into<String>) {
        if let Ok(mut owners) = self.owners.write() {
            owners.insert(user_id.into());
        }
    }

    pub fn is_owner(&self, user_id: &str) -> bool {
        self.owners
            .read()
            .map(|owners| owners.contains(user_id))
            .unwrap_or(false)
    }

    /// Owner ids, sorted
    pub fn owners(&self) -> Vec<String> {
        let mut owners: Vec<String> = self
            .owners
            .read()
            .map(|owners| owners.iter().cloned().collect())
            .unwrap_or_default();
        owners.sort();
        owners
    }

    /// The bot's own account, known once the session is ready
    pub fn current_user(&self) -> Option<User> {
        self.current_user.read().ok().and_then(|user| user.clone())
    }

    pub fn uptime(&self) -> Duration {
        Utc::now() - self.started_at
    }

    /// Record the bot account and fire the ready signal.
    pub fn mark_ready(&self, user: User) {
        if let Ok(mut current) = self.current_user.write() {
            *current = Some(user);
        }
        self.ready.send_replace(true);
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    pub fn ready_signal(&self) -> watch::Receiver<bool> {
        self.ready.subscribe()
    }

    pub async fn wait_until_ready(&self) {
        let mut ready = self.ready.subscribe();
        let _ = ready.wait_for(|ready| *ready).await;
    }

    pub fn request_shutdown(&self) {
        tracing::info!("Shutdown requested");
        self.shutdown.send_replace(true);
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }
}

/// Everything a command handler can look at while it runs
pub struct CommandContext<'a> {
    pub message: &'a Message,
    pub args: &'a [String],
    pub invoked_with: &'a str,
    pub bot: &'a BotContext,
    pub commands: &'a CommandRegistry,
}

impl<'a> CommandContext<'a> {
    pub fn author(&self) -> &User {
        &self.message.author
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Arguments from `index` on, joined back with single spaces
    pub fn rest(&self, index: usize) -> Option<String> {
        if index >= self.args.len() {
            return None;
        }
        Some(self.args[index..].join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owners_merge() {
        let context = BotContext::new("!").with_owners(vec!["2".to_string(), "1".to_string()]);
        context.add_owner("3");
        assert!(context.is_owner("1"));
        assert!(!context.is_owner("4"));
        assert_eq!(context.owners(), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_ready_signal() {
        let context = BotContext::new("!");
        assert!(!context.is_ready());
        assert!(context.current_user().is_none());

        context.mark_ready(User::new("42").with_username("krypton").bot());
        context.wait_until_ready().await;

        assert!(context.is_ready());
        assert_eq!(context.current_user().unwrap().id, "42");
    }

    #[test]
    fn test_shutdown_signal_observed_by_late_subscriber() {
        let context = BotContext::new("!");
        context.request_shutdown();
        assert!(*context.shutdown_signal().borrow());
    }
}
