//! Log levels

/// Message priority, numbered like the kernel's printk levels.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// System is unusable (KERN_EMERG)
    Emergency = 0,
    /// Action must be taken immediately (KERN_ALERT)
    Alert = 1,
    /// Critical conditions (KERN_CRIT)
    Critical = 2,
    /// Error conditions, e.g. a refused `sigaction` (KERN_ERR)
    Error = 3,
    /// Warning conditions (KERN_WARNING)
    Warning = 4,
    /// Normal but significant condition (KERN_NOTICE)
    Notice = 5,
    /// Informational (KERN_INFO)
    Info = 6,
    /// Debug-level messages (KERN_DEBUG)
    Debug = 7,
}

impl LogLevel {
    /// Bracketed tag printed at the start of the line
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Emergency => "[EMERG]",
            LogLevel::Alert => "[ALERT]",
            LogLevel::Critical => "[CRIT]",
            LogLevel::Error => "[ERR]",
            LogLevel::Warning => "[WARNING]",
            LogLevel::Notice => "[NOTICE]",
            LogLevel::Info => "[INFO]",
            LogLevel::Debug => "[DEBUG]",
        }
    }

    /// ANSI color used when stderr is a terminal
    pub const fn color_code(&self) -> &'static str {
        match self {
            Self::Emergency | Self::Alert | Self::Critical => "\x1b[1;31m",
            Self::Error => "\x1b[31m",
            Self::Warning => "\x1b[33m",
            Self::Notice => "\x1b[1;37m",
            Self::Info => "\x1b[37m",
            Self::Debug => "\x1b[90m",
        }
    }

    /// ANSI sequence ending a colored line
    pub const fn reset_color_code(&self) -> &'static str {
        "\x1b[0m"
    }

    /// Values above 7 saturate to `Debug`.
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Emergency,
            1 => Self::Alert,
            2 => Self::Critical,
            3 => Self::Error,
            4 => Self::Warning,
            5 => Self::Notice,
            6 => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Parses a level name as accepted in `PET_LOG_LEVEL`.
    ///
    /// Both the short kernel spellings (`err`, `warn`, `emerg`, ...) and the
    /// full names are accepted, case-insensitively, as well as a bare digit.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Ok(n) = name.parse::<u8>() {
            return (n <= 7).then(|| Self::from_u8(n));
        }
        let level = match name.to_ascii_lowercase().as_str() {
            "emerg" | "emergency" => Self::Emergency,
            "alert" => Self::Alert,
            "crit" | "critical" => Self::Critical,
            "err" | "error" => Self::Error,
            "warn" | "warning" => Self::Warning,
            "notice" => Self::Notice,
            "info" => Self::Info,
            "debug" => Self::Debug,
            _ => return None,
        };
        Some(level)
    }
}
