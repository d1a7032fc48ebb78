//! Logging macros
//!
//! Linux kernel-style logging macros (`pr_*`) for the parts of the crate that
//! run on an ordinary thread: init, teardown and configuration.
//!
//! # Usage
//!
//! ```rust
//! use pet_debug_hooks::{pr_err, pr_info};
//!
//! pr_info!("hooks armed");
//! pr_err!("sigaction failed for {}", "SIGSEGV");
//! ```
//!
//! # Signal context
//!
//! None of these macros may be used inside the fault handler: they go through
//! `core::fmt`, which is not async-signal-safe. The handler writes through
//! `rendezvous::banner` only.

/// Internal implementation macro with level filtering
///
/// Checks if the log level is enabled before calling the logging implementation.
/// This early check avoids unnecessary format string evaluation for disabled levels.
#[macro_export]
macro_rules! __log_impl_filtered {
    ($level:expr, $args:expr) => {
        if $crate::log::is_level_enabled($level) {
            $crate::log::log_impl($level, $args);
        }
    };
}

/// Logs a message at the ERROR level
///
/// # Examples
///
/// ```rust
/// # use pet_debug_hooks::pr_err;
/// pr_err!("failed to restore {}", "SIGBUS");
/// ```
#[macro_export]
macro_rules! pr_err {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!(
            $crate::log::LogLevel::Error,
            format_args!($($arg)*)
        )
    }
}

/// Logs a message at the WARNING level
///
/// Warning logs indicate conditions that should be reviewed but don't prevent
/// normal operation, e.g. a refused double init.
#[macro_export]
macro_rules! pr_warn {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!(
            $crate::log::LogLevel::Warning,
            format_args!($($arg)*)
        )
    }
}

/// Logs a message at the INFO level
///
/// # Examples
///
/// ```rust
/// # use pet_debug_hooks::pr_info;
/// pr_info!("restored {} dispositions", 5);
/// ```
#[macro_export]
macro_rules! pr_info {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!(
            $crate::log::LogLevel::Info,
            format_args!($($arg)*)
        )
    }
}

/// Logs a message at the DEBUG level
///
/// Debug logs provide detailed diagnostic information, such as each saved
/// disposition. Disabled unless `PET_LOG_LEVEL=debug`.
#[macro_export]
macro_rules! pr_debug {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!(
            $crate::log::LogLevel::Debug,
            format_args!($($arg)*)
        )
    }
}
