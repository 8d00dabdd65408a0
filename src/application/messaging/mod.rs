//! Message handling - Turning raw message text into command invocations

pub mod parser;

pub use parser::{parse_user_mention, CommandParser, Invocation};
