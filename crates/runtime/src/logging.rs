use std::sync::OnceLock;

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::PROGRAM_LOG_LEVEL;

enum LogTarget {
    Stderr,
}

pub struct Logger {
    level: Level,
    target: LogTarget,
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let msg = format_line(record);

            match &self.target {
                LogTarget::Stderr => {
                    eprintln!("{msg}")
                }
            }
        }
    }

    fn flush(&self) {}
}

fn format_line(record: &Record<'_>) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!(
        "{} {} [{}] {}",
        timestamp,
        record.level(),
        record.target(),
        record.args()
    )
}

/// Parse a level name; `off` and garbage map to `None`.
fn parse_level(raw: &str) -> Option<Level> {
    raw.parse::<LevelFilter>()
        .ok()
        .and_then(|filter| filter.to_level())
}

/// An explicit level (e.g. from `--log-level`) wins over the environment.
fn resolve_level(explicit: Option<&str>) -> Level {
    explicit
        .and_then(parse_level)
        .or_else(|| {
            std::env::var(PROGRAM_LOG_LEVEL)
                .ok()
                .as_deref()
                .and_then(parse_level)
        })
        .unwrap_or(Level::Warn)
}

pub fn init_with(explicit: Option<&str>) -> Result<(), SetLoggerError> {
    install(resolve_level(explicit))
}

fn install(level: Level) -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<Logger> = OnceLock::new();

    // Only the first call installs; later calls keep the first level so the
    // logger and log::max_level never disagree.
    let init_call = LOGGER.get().is_none();

    let logger = LOGGER.get_or_init(|| Logger {
        level,
        target: LogTarget::Stderr,
    });

    if init_call {
        log::set_logger(logger)?;
        log::set_max_level(logger.level.to_level_filter());
    }

    Ok(())
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
