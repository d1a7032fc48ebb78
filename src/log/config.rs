//! Logging configuration

/// Maximum length of a single log message
pub const MAX_LOG_MESSAGE_LENGTH: usize = 256;

/// Default log level
pub const DEFAULT_LOG_LEVEL: super::level::LogLevel = super::level::LogLevel::Info;

/// Tag printed in front of every message
pub const LOG_TAG: &str = "pet-debug-hooks";
