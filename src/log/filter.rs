//! Log level filtering
//!
//! A single global threshold decides which messages reach stderr. It can be
//! adjusted at runtime, e.g. from `PET_LOG_LEVEL` during init.

use core::sync::atomic::{AtomicU8, Ordering};

use super::config::DEFAULT_LOG_LEVEL;
use super::level::LogLevel;

/// Global log level threshold
///
/// Logs with level <= this threshold are printed.
static GLOBAL_LOG_LEVEL: AtomicU8 = AtomicU8::new(DEFAULT_LOG_LEVEL as u8);

/// Checks if a log level is enabled
///
/// This is called at macro expansion time to avoid unnecessary work
/// for disabled log levels.
#[inline(always)]
#[doc(hidden)]
pub fn is_level_enabled(level: LogLevel) -> bool {
    let global_level = GLOBAL_LOG_LEVEL.load(Ordering::Relaxed);
    level as u8 <= global_level
}

/// Sets the global log level threshold
///
/// Logs with priority higher than this level will be discarded.
pub fn set_global_level(level: LogLevel) {
    GLOBAL_LOG_LEVEL.store(level as u8, Ordering::Release);
}

/// Gets the current global log level
pub fn get_global_level() -> LogLevel {
    let level = GLOBAL_LOG_LEVEL.load(Ordering::Relaxed);
    LogLevel::from_u8(level)
}
