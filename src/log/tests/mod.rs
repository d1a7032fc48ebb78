// src/log/tests/mod.rs

use super::config::MAX_LOG_MESSAGE_LENGTH;
use super::level::LogLevel;
use super::{LogEntry, direct_print_entry};
use crate::util::FixedBuf;
use crate::{kassert, test_case};

// ========== 测试辅助宏 ==========

/// 测试专用日志宏
///
/// 模拟生产宏的格式化路径，但输出到内存缓冲区
macro_rules! test_log {
    ($out:expr, $level:expr, $($arg:tt)*) => {
        direct_print_entry(
            &mut $out,
            &LogEntry::from_args($level, format_args!($($arg)*)),
            false,
        )
    };
}

mod filter;
