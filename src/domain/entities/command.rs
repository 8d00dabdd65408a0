use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use super::{Embed, Permission, Reply};
use crate::application::context::CommandContext;
use crate::application::errors::{CommandError, ExtensionError};

/// Command handler function type
pub type CommandHandler =
    Box<dyn Fn(&CommandContext<'_>) -> Result<Response, CommandError> + Send + Sync>;

/// A positional command parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub required: bool,
}

impl Param {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }
}

/// Allow `rate` invocations per user within `per`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    pub rate: u32,
    pub per: Duration,
}

impl Cooldown {
    pub fn new(rate: u32, per: Duration) -> Self {
        Self { rate, per }
    }
}

/// Side effect a command asks the runtime to carry out on the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Kick { user_id: String, reason: Option<String> },
    Ban { user_id: String, reason: Option<String> },
    Shutdown,
}

/// What a successful command produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub reply: Option<Reply>,
    pub actions: Vec<Action>,
}

impl Response {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            reply: Some(Reply::Text(text.into())),
            actions: Vec::new(),
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            reply: Some(embed.into()),
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }
}

/// Represents a bot command
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub usage: Option<String>,
    pub params: Vec<Param>,
    pub user_permissions: Vec<Permission>,
    pub bot_permissions: Vec<Permission>,
    pub owner_only: bool,
    pub guild_only: bool,
    pub cooldown: Option<Cooldown>,
    pub handler: Option<CommandHandler>,
    /// Extension that registered the command, set on install
    pub extension: Option<String>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            usage: None,
            params: Vec::new(),
            user_permissions: Vec::new(),
            bot_permissions: Vec::new(),
            owner_only: false,
            guild_only: false,
            cooldown: None,
            handler: None,
            extension: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Require a permission from the invoking user
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.user_permissions.push(permission);
        self
    }

    /// Require a permission from the bot itself
    pub fn with_bot_permission(mut self, permission: Permission) -> Self {
        self.bot_permissions.push(permission);
        self
    }

    pub fn owner_only(mut self) -> Self {
        self.owner_only = true;
        self
    }

    pub fn guild_only(mut self) -> Self {
        self.guild_only = true;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Cooldown) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CommandContext<'_>) -> Result<Response, CommandError> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn qualified_name(&self) -> &str {
        &self.name
    }

    /// Usage line, generated from the parameters when none was given
    pub fn signature(&self) -> String {
        if let Some(usage) = &self.usage {
            return usage.clone();
        }
        let mut signature = self.name.clone();
        for param in &self.params {
            if param.required {
                signature.push_str(&format!(" <{}>", param.name));
            } else {
                signature.push_str(&format!(" [{}]", param.name));
            }
        }
        signature
    }

    pub fn matches(&self, input: &str) -> bool {
        let input_lower = input.to_lowercase();
        self.name.to_lowercase() == input_lower ||
            self.aliases.iter().any(|a| a.to_lowercase() == input_lower)
    }

    fn keys(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .map(|k| k.to_lowercase())
    }
}

/// Command table: written while extensions load, read-only afterwards
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
    extensions: Vec<String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install every command of one extension, or none of them.
    pub fn install(&mut self, extension: &str, commands: Vec<Command>) -> Result<(), ExtensionError> {
        if self.is_extension_loaded(extension) {
            return Err(ExtensionError::AlreadyLoaded(extension.to_string()));
        }

        let mut taken: HashSet<String> = self.commands.values().flat_map(|c| c.keys()).collect();
        for command in &commands {
            for key in command.keys() {
                if !taken.insert(key.clone()) {
                    return Err(ExtensionError::DuplicateCommand {
                        extension: extension.to_string(),
                        command: key,
                    });
                }
            }
        }

        for mut command in commands {
            command.extension = Some(extension.to_string());
            self.commands.insert(command.name.to_lowercase(), command);
        }
        self.extensions.push(extension.to_string());
        Ok(())
    }

    pub fn is_extension_loaded(&self, extension: &str) -> bool {
        self.extensions.iter().any(|e| e == extension)
    }

    /// Extensions in load order
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(&name.to_lowercase())
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.get(input)
            .or_else(|| self.commands.values().find(|c| c.matches(input)))
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    /// Commands grouped by the extension that registered them, sorted by name
    pub fn by_extension(&self) -> BTreeMap<&str, Vec<&Command>> {
        let mut groups: BTreeMap<&str, Vec<&Command>> = BTreeMap::new();
        for command in self.commands.values() {
            let extension = command.extension.as_deref().unwrap_or("other");
            groups.entry(extension).or_default().push(command);
        }
        for commands in groups.values_mut() {
            commands.sort_by(|a, b| a.name.cmp(&b.name));
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
