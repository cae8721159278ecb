//! Process-wide logging through `log` and `fern`.
//!
//! Every line reads `<timestamp> [<logger name>] [<LEVEL>] <message>`.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use log::LevelFilter;

use crate::config::LoggingConfig;
use crate::constants::LOG_TIMESTAMP_FORMAT;

/// Parse a configured level name, case-insensitively.
pub fn level_filter(level: &str) -> Result<LevelFilter> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| anyhow::anyhow!("Invalid log level '{}'", level))
}

/// One formatted log line without the trailing newline.
pub fn format_line(logger_name: &str, level: log::Level, message: &fmt::Arguments<'_>) -> String {
    format!(
        "{} [{}] [{}] {}",
        Local::now().format(LOG_TIMESTAMP_FORMAT),
        logger_name,
        level,
        message
    )
}

/// Install the global logger. Fails if a logger is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let level = level_filter(&config.level)?;
    let name = config.logger_name.clone();

    let mut dispatch = fern::Dispatch::new()
        .format(move |out, message, record| out.finish(format_args!("{}", format_line(&name, record.level(), message))))
        .level(level)
        .chain(std::io::stderr());

    if let Some(path) = &config.file {
        dispatch = dispatch.chain(open_log_file(path)?);
    }

    dispatch.apply().context("Logger already initialized")?;
    log::debug!("Logging initialized at level {}", level);
    Ok(())
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    fern::log_file(path).with_context(|| format!("Failed to open log file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_level_names_case_insensitively() {
        assert_eq!(level_filter("info").unwrap(), LevelFilter::Info);
        assert_eq!(level_filter("DEBUG").unwrap(), LevelFilter::Debug);
        assert_eq!(level_filter(" warn ").unwrap(), LevelFilter::Warn);
        assert_eq!(level_filter("off").unwrap(), LevelFilter::Off);
        assert!(level_filter("verbose").is_err());
    }

    #[test]
    fn lines_carry_logger_name_and_level() {
        let line = format_line("database_tests", log::Level::Warn, &format_args!("Rollback for {}", "User"));
        assert!(line.ends_with(" [database_tests] [WARN] Rollback for User"), "{line}");
    }
}
