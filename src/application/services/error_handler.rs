//! Error classifier - Decides which command failures get a reply

use crate::application::errors::CommandError;
use crate::domain::entities::{Embed, Permission};

/// What to do with a failed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Send this embed to the originating channel
    Reply(Embed),
    /// Not handled here; the caller propagates the error unchanged
    PassThrough,
}

/// Map a command error to its reply.
pub fn classify(error: &CommandError) -> Disposition {
    match error {
        CommandError::Cooldown { retry_after } => {
            let total = retry_after.as_secs();
            let (minutes, seconds) = (total / 60, total % 60);
            Disposition::Reply(Embed::error(format!(
                "Please slow down! Try again in {}m {}s.",
                minutes, seconds
            )))
        }
        CommandError::NotOwner => {
            Disposition::Reply(Embed::error("You are not the owner of the bot!"))
        }
        CommandError::MissingPermissions(missing) => Disposition::Reply(Embed::error(format!(
            "You are missing: {}",
            join_permissions(missing)
        ))),
        CommandError::BotMissingPermissions(missing) => Disposition::Reply(Embed::error(format!(
            "I am missing: {}",
            join_permissions(missing)
        ))),
        CommandError::MissingRequiredArgument { .. } => Disposition::Reply(
            Embed::error(capitalize(&error.to_string())).with_title("Error!"),
        ),
        CommandError::NotFound(_)
        | CommandError::NoPrivateMessage
        | CommandError::BadArgument(_)
        | CommandError::ExecutionFailed(_) => Disposition::PassThrough,
    }
}

fn join_permissions(permissions: &[Permission]) -> String {
    permissions
        .iter()
        .map(Permission::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// First character upper-cased, the rest lower-cased
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::embed::ERROR_COLOR;
    use std::time::Duration;

    fn reply(error: CommandError) -> Embed {
        match classify(&error) {
            Disposition::Reply(embed) => embed,
            Disposition::PassThrough => panic!("{error:?} should be answered"),
        }
    }

    #[test]
    fn test_cooldown_splits_minutes_and_seconds() {
        let embed = reply(CommandError::Cooldown {
            retry_after: Duration::from_secs_f64(125.0),
        });
        assert!(embed.description.contains("2m 5s"));
        assert_eq!(embed.color, ERROR_COLOR);
    }

    #[test]
    fn test_cooldown_truncates_fractions() {
        let embed = reply(CommandError::Cooldown {
            retry_after: Duration::from_secs_f64(59.9),
        });
        assert_eq!(embed.description, "Please slow down! Try again in 0m 59s.");
    }

    #[test]
    fn test_not_owner() {
        let embed = reply(CommandError::NotOwner);
        assert_eq!(embed.description, "You are not the owner of the bot!");
        assert!(embed.title.is_none());
    }

    #[test]
    fn test_missing_permissions_keep_order() {
        let embed = reply(CommandError::MissingPermissions(vec![
            Permission::BanMembers,
            Permission::KickMembers,
        ]));
        assert!(embed.description.contains("ban_members, kick_members"));
        assert!(embed.description.starts_with("You are missing: "));
    }

    #[test]
    fn test_bot_missing_permissions() {
        let embed = reply(CommandError::BotMissingPermissions(vec![Permission::ManageMessages]));
        assert_eq!(embed.description, "I am missing: manage_messages");
    }

    #[test]
    fn test_missing_argument_is_capitalized() {
        let embed = reply(CommandError::MissingRequiredArgument {
            param: "question".to_string(),
        });
        assert_eq!(embed.title.as_deref(), Some("Error!"));
        assert_eq!(embed.description, "Question is a required argument that is missing.");
    }

    #[test]
    fn test_other_errors_pass_through() {
        for error in [
            CommandError::NotFound("nope".to_string()),
            CommandError::NoPrivateMessage,
            CommandError::BadArgument("not a user".to_string()),
            CommandError::ExecutionFailed("boom".to_string()),
        ] {
            assert_eq!(classify(&error), Disposition::PassThrough);
        }
    }

    #[test]
    fn test_capitalize_lowers_the_rest() {
        assert_eq!(capitalize("userID is missing"), "Userid is missing");
        assert_eq!(capitalize(""), "");
    }
}
