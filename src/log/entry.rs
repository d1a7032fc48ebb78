//! Stack-only log entry

use super::config::MAX_LOG_MESSAGE_LENGTH;
use super::level::LogLevel;
use core::cmp::min;
use core::fmt::{self, Write};

/// One formatted log line, held entirely on the stack.
#[derive(Debug, Clone)]
pub struct LogEntry {
    level: LogLevel,
    length: usize,
    message: [u8; MAX_LOG_MESSAGE_LENGTH],
}

impl LogEntry {
    /// Creates an entry from a plain message, truncated to
    /// [`MAX_LOG_MESSAGE_LENGTH`] bytes.
    pub fn new(level: LogLevel, message: &str) -> Self {
        let mut entry = Self::empty(level);
        let mut writer = MessageWriter::new(&mut entry.message);
        let _ = writer.write_str(message);
        entry.length = writer.len();
        entry
    }

    /// Creates an entry by formatting `args` without allocating.
    pub fn from_args(level: LogLevel, args: fmt::Arguments) -> Self {
        let mut entry = Self::empty(level);

        let mut writer = MessageWriter::new(&mut entry.message);
        let _ = core::fmt::write(&mut writer, args);

        entry.length = writer.len();

        entry
    }

    const fn empty(level: LogLevel) -> Self {
        Self {
            level,
            length: 0,
            message: [0; MAX_LOG_MESSAGE_LENGTH],
        }
    }

    /// The formatted message
    pub fn message(&self) -> &str {
        // MessageWriter never splits a code point, so the prefix is valid UTF-8.
        core::str::from_utf8(&self.message[..self.length]).unwrap_or("")
    }

    /// The entry's level
    pub fn level(&self) -> LogLevel {
        self.level
    }
}

/// a helper to write message from args to [u8; MAX_LOG_MESSAGE_LENGTH]
struct MessageWriter<'a> {
    buffer: &'a mut [u8],
    pos: usize,
}

impl<'a> MessageWriter<'a> {
    fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, pos: 0 }
    }

    fn len(&self) -> usize {
        self.pos
    }
}

impl Write for MessageWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let remaining = self.buffer.get_mut(self.pos..).unwrap_or(&mut []);
        let mut to_copy = min(s.len(), remaining.len());
        // back off to a char boundary so the stored prefix stays valid UTF-8
        while !s.is_char_boundary(to_copy) {
            to_copy -= 1;
        }

        remaining[..to_copy].copy_from_slice(&s.as_bytes()[..to_copy]);
        self.pos += to_copy;
        Ok(())
    }
}
