//! Leveled logging to stderr
//!
//! Messages are formatted into a fixed-size [`LogEntry`] (no heap) and written
//! with a single unbuffered `write(2)` sequence, bypassing the standard
//! library's locked `Stderr`.

pub mod config;
mod entry;
mod filter;
pub mod level;
pub mod macros;

pub use entry::LogEntry;
pub use filter::{get_global_level, is_level_enabled, set_global_level};
pub use level::LogLevel;

use crate::util::{RawWrite, Stderr, stdio::stderr_is_tty};

/// Implementation of the log macros
pub fn log_impl(level: LogLevel, args: core::fmt::Arguments) {
    let entry = LogEntry::from_args(level, args);
    direct_print_entry(&mut Stderr, &entry, stderr_is_tty());
}

fn direct_print_entry<W: RawWrite>(out: &mut W, entry: &LogEntry, color: bool) {
    if color {
        out.write_str_raw(entry.level().color_code());
    }
    out.write_str_raw(entry.level().as_str());
    out.write_raw(b" ");
    out.write_str_raw(config::LOG_TAG);
    out.write_raw(b": ");
    out.write_str_raw(entry.message());
    if color {
        out.write_str_raw(entry.level().reset_color_code());
    }
    out.write_raw(b"\n");
}

#[cfg(test)]
mod tests;
