//! Tracing subscriber setup.
//!
//! Logs go to the console and to a size-rotated file. The file layer writes
//! through [`tracing_appender::non_blocking`], so the returned
//! [`LoggingGuard`] must be held until exit for buffered lines to reach disk.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LoggingConfig;
use crate::rotation::SizeRotatingWriter;

/// Command-line override of the configured log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Normal,
    Verbose,
    Quiet,
}

impl Verbosity {
    /// `--quiet` wins over `--verbose`.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (_, true) => Self::Quiet,
            (true, false) => Self::Verbose,
            (false, false) => Self::Normal,
        }
    }
}

/// Keeps the file writer alive. Dropping it flushes pending lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: WorkerGuard,
}

/// Pick the filter directive: flags, then `RUST_LOG`, then the config.
pub fn filter_directive(level: &str, verbosity: Verbosity, rust_log: Option<&str>) -> String {
    match verbosity {
        Verbosity::Quiet => "warn".to_string(),
        Verbosity::Verbose => "debug".to_string(),
        Verbosity::Normal => rust_log
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(level)
            .to_string(),
    }
}

/// Install the global subscriber.
pub fn init_logging(config: &LoggingConfig, verbosity: Verbosity) -> Result<LoggingGuard> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(&config.level, verbosity, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("Invalid log filter '{}'", directive))?;

    let writer = SizeRotatingWriter::new(
        &config.directory,
        config.file_name.as_str(),
        config.max_file_size(),
        config.compress,
    )
    .with_context(|| {
        format!(
            "Failed to open log file {}",
            config.file_path().display()
        )
    })?;
    let (non_blocking, guard) = tracing_appender::non_blocking(writer);

    let console_layer = config
        .console
        .then(|| fmt::layer().with_writer(std::io::stdout).with_target(false));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(
        "Logging to {} (rotate at {} MB, compress: {})",
        config.file_path().display(),
        config.max_file_size_mb,
        config.compress
    );

    Ok(LoggingGuard { _file: guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
    }

    #[test]
    fn test_filter_uses_config_level() {
        assert_eq!(filter_directive("debug", Verbosity::Normal, None), "debug");
    }

    #[test]
    fn test_filter_prefers_rust_log() {
        assert_eq!(
            filter_directive("debug", Verbosity::Normal, Some("inquiry_core=trace")),
            "inquiry_core=trace"
        );
        assert_eq!(filter_directive("debug", Verbosity::Normal, Some(" ")), "debug");
    }

    #[test]
    fn test_filter_flags_override_everything() {
        assert_eq!(filter_directive("debug", Verbosity::Quiet, Some("trace")), "warn");
        assert_eq!(filter_directive("warn", Verbosity::Verbose, Some("error")), "debug");
    }
}
