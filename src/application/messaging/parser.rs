//! Command parser - Splits message text into a command name and arguments

/// A parsed command call: the name as typed plus its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<String>,
}

/// Recognizes the command prefix (or a mention of the bot) and splits the rest
pub struct CommandParser {
    command_prefix: String,
}

impl CommandParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.command_prefix
    }

    /// Parse message text; `None` when the text is not addressed to the bot.
    pub fn parse(&self, text: &str, bot_id: Option<&str>) -> Option<Invocation> {
        let body = self.strip_prefix(text, bot_id)?;

        let mut parts = split_arguments(body).into_iter();
        let name = parts.next().unwrap_or_default();
        Some(Invocation {
            name,
            args: parts.collect(),
        })
    }

    fn strip_prefix<'t>(&self, text: &'t str, bot_id: Option<&str>) -> Option<&'t str> {
        if let Some(id) = bot_id {
            for mention in [format!("<@{}>", id), format!("<@!{}>", id)] {
                // `<@id>ping` is not addressed to the bot
                if let Some(rest) = text.strip_prefix(mention.as_str()) {
                    if rest.starts_with(char::is_whitespace) {
                        return Some(rest.trim_start());
                    }
                }
            }
        }
        if self.command_prefix.is_empty() {
            return None;
        }
        text.strip_prefix(self.command_prefix.as_str())
    }
}

/// Whitespace split that keeps "double quoted" runs together
fn split_arguments(text: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in text.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        args.push(current);
    }
    args
}

/// Accepts `<@id>`, `<@!id>` or a bare numeric id
pub fn parse_user_mention(input: &str) -> Option<String> {
    let id = input
        .strip_prefix("<@")
        .and_then(|rest| rest.strip_suffix('>'))
        .map(|rest| rest.trim_start_matches('!'))
        .unwrap_or(input);

    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        Some(id.to_string())
    } else {
        None
    }
}
