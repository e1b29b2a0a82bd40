//! Log setup for the `savings-calculator` binary.
//!
//! Stdout carries the report, so log records go to stderr: compact, colored
//! when stderr is a terminal. With a log file configured, records are also
//! appended there with a local timestamp.
//!
//! The filter comes from `--log-level` or the settings file, then `RUST_LOG`,
//! then [`DEFAULT_FILTER`].

use std::{
    fs::File,
    io::{self, IsTerminal},
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Filter used when neither a level nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "warn";

/// Where and how much to log, resolved from flags and settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions<'a> {
    /// Bare level or full `EnvFilter` directive.
    pub level: Option<&'a str>,
    /// File to append records to.
    pub file: Option<&'a Path>,
}

/// One line per record: `[timestamp] LEVEL target: fields`.
struct CliFormat {
    timestamp: bool,
}

impl CliFormat {
    fn level_color(level: Level) -> &'static str {
        match level {
            Level::ERROR => "\x1b[31m",
            Level::WARN => "\x1b[33m",
            Level::INFO => "\x1b[32m",
            Level::DEBUG => "\x1b[34m",
            Level::TRACE => "\x1b[35m",
        }
    }
}

impl<S, N> FormatEvent<S, N> for CliFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        if self.timestamp {
            write!(writer, "{} ", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))?;
        }
        if writer.has_ansi_escapes() {
            let color = Self::level_color(*meta.level());
            write!(writer, "{color}{:>5}\x1b[0m ", meta.level())?;
        } else {
            write!(writer, "{:>5} ", meta.level())?;
        }
        write!(writer, "{}: ", meta.target())?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn build_filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("Invalid log level '{directive}'")),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Cannot open log file '{}'", path.display()))
}

/// Installs the global subscriber. Call once, after the command line and the
/// settings file have been read.
pub fn init_logging(options: LogOptions<'_>) -> Result<()> {
    let filter = build_filter(options.level)?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(CliFormat { timestamp: false })
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = match options.file {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .event_format(CliFormat { timestamp: true })
                .with_ansi(false)
                .with_writer(Mutex::new(open_log_file(path)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Logging was already initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_filter_accepts_levels_and_directives() {
        assert!(build_filter(Some("debug")).is_ok());
        assert!(build_filter(Some("warn,savings_core=trace")).is_ok());
        assert!(build_filter(None).is_ok());
    }

    #[test]
    fn build_filter_rejects_unknown_level() {
        let err = build_filter(Some("savings_core=loud")).unwrap_err();

        assert!(err.to_string().contains("savings_core=loud"));
    }

    #[test]
    fn open_log_file_reports_missing_directory() {
        let err = open_log_file(Path::new("/nonexistent/dir/savings.log")).unwrap_err();

        assert!(err.to_string().contains("/nonexistent/dir/savings.log"));
    }
}
