//! constants and runtime configuration for the debug hooks
//!
//! Compile-time constants live at the top; [`Config`] collects the knobs
//! that can be changed through the environment.

use crate::log::LogLevel;
use crate::log::config::DEFAULT_LOG_LEVEL;

// about the rendezvous
/// Seconds slept between two reads of the wait flag
pub const POLL_INTERVAL_SECS: libc::time_t = 1;
/// Horizontal rule framing the banner
pub const BANNER_RULE: &str = "**********************************************************";

// environment variables
/// Set to `0`, `false`, `off` or `no` to skip arming in [`crate::init_from_env`]
pub const ENV_ENABLE: &str = "PET_DEBUG_HOOKS";
/// Log level name, see [`LogLevel::from_name`]
pub const ENV_LOG_LEVEL: &str = "PET_LOG_LEVEL";

/// Runtime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Whether init should arm the hooks at all
    pub enabled: bool,
    /// Threshold applied to the `pr_*` macros
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl Config {
    /// Reads [`ENV_ENABLE`] and [`ENV_LOG_LEVEL`] from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    ///
    /// Unknown log level names fall back to the default level; an unset
    /// enable variable means enabled.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_ENABLE) {
            config.enabled = !is_disabling_value(&value);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).as_deref().and_then(LogLevel::from_name) {
            config.log_level = level;
        }

        config
    }
}

fn is_disabling_value(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "off" | "no"
    )
}
