use std::sync::OnceLock;

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::PROGRAM_LOG_LEVEL;

pub struct Logger {
    level: Level,
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            eprintln!(
                "{} {} [{}] {}",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Level requested through the environment, if any and if it parses.
fn level_from_env() -> Option<Level> {
    std::env::var(PROGRAM_LOG_LEVEL)
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .and_then(|filter| filter.to_level())
}

/// Map `-v` occurrences on the command line to a level, starting from `Warn`.
fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::Warn,
        1 => Level::Info,
        2 => Level::Debug,
        _ => Level::Trace,
    }
}

pub fn init() -> Result<(), SetLoggerError> {
    init_with_verbosity(0)
}

/// Diagnostics level for a run. The environment variable, when set to a valid
/// level, takes precedence over the command-line verbosity.
fn effective_level(verbose: u8) -> Level {
    level_from_env().unwrap_or_else(|| level_for_verbosity(verbose))
}

/// Install the stderr logger at [`effective_level`].
pub fn init_with_verbosity(verbose: u8) -> Result<(), SetLoggerError> {
    _init(effective_level(verbose))
}

pub fn _init(level: Level) -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<Logger> = OnceLock::new();

    // Only the first call installs the logger, later calls must not
    // move the max level away from the one the logger was built with.
    let init_call = LOGGER.get().is_none();

    let logger = LOGGER.get_or_init(|| Logger { level });

    if init_call {
        log::set_logger(logger)?;
        log::set_max_level(level.to_level_filter());
    }

    Ok(())
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
