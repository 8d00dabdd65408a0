//! Logging setup: colored console plus a plain file, both fed by `tracing`

use std::fmt;
use std::path::Path;

use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::application::errors::{BotError, ConfigError};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DEFAULT_FILTER: &str = "info,serenity=warn,tracing::span=warn";

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const BLACK: &str = "\x1b[30m";
const GREEN: &str = "\x1b[32m";

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::TRACE | Level::DEBUG => "\x1b[38m\x1b[1m",
        Level::INFO => "\x1b[34m\x1b[1m",
        Level::WARN => "\x1b[33m\x1b[1m",
        Level::ERROR => "\x1b[31m",
    }
}

/// Level names as they appear in log lines
fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::WARN => "WARNING",
        _ => level.as_str(),
    }
}

/// `2024-01-01 12:00:00 INFO     target ` with ANSI colors when enabled
fn console_prefix(timestamp: &str, level: &Level, target: &str, ansi: bool) -> String {
    if ansi {
        format!(
            "{BLACK}{BOLD}{timestamp}{RESET} {}{:<8}{RESET} {GREEN}{BOLD}{target}{RESET} ",
            level_color(level),
            level_name(level)
        )
    } else {
        format!("{timestamp} {:<8} {target} ", level_name(level))
    }
}

/// `[2024-01-01 12:00:00] [INFO    ] target: `
fn file_prefix(timestamp: &str, level: &Level, target: &str) -> String {
    format!("[{timestamp}] [{:<8}] {target}: ", level_name(level))
}

/// Console line layout, colored by severity
pub struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let timestamp = Local::now().format(TIME_FORMAT).to_string();
        let ansi = writer.has_ansi_escapes();
        write!(writer, "{}", console_prefix(&timestamp, meta.level(), meta.target(), ansi))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// File line layout, never colored
pub struct FileFormat;

impl<S, N> FormatEvent<S, N> for FileFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let timestamp = Local::now().format(TIME_FORMAT).to_string();
        write!(writer, "{}", file_prefix(&timestamp, meta.level(), meta.target()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the global subscriber. The log file is truncated first.
///
/// Keep the returned guard alive for the whole process; dropping it flushes
/// and stops the file writer.
pub fn init(log_file: &Path) -> Result<WorkerGuard, BotError> {
    let file_name = log_file
        .file_name()
        .ok_or_else(|| ConfigError::InvalidValue(format!("LOG_FILE={}", log_file.display())))?;
    let directory = match log_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(directory)?;
    if log_file.exists() {
        std::fs::remove_file(log_file)?;
    }

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(std::io::stdout)
        .with_ansi(true);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(FileFormat)
        .with_writer(file_writer)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| BotError::Internal(format!("Failed to install logger: {}", e)))?;

    Ok(guard)
}
