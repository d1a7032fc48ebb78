//! 设施错误类型
//!
//! 只有 init 可能失败；故障处理函数内部没有可报告的错误。
//! 可通过 [`HookError::to_errno()`] 转换为 C 接口的返回值。

use core::fmt;

use crate::uapi::signal::FaultKind;

/// init/teardown 的错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookError {
    /// 操作系统拒绝为某个故障类型安装处理函数。
    /// 已安装的类型已经回滚，设施保持未布防状态。
    InitRejected {
        /// 被拒绝的故障类型
        kind: FaultKind,
        /// sigaction 返回的 errno
        errno: i32,
    },
    /// 设施已布防时再次调用 init。已保存的原处理方式保持不变。
    AlreadyArmed,
}

impl HookError {
    /// 转换为 C 接口错误码（负数）
    pub fn to_errno(&self) -> i32 {
        match self {
            HookError::InitRejected { errno, .. } if *errno > 0 => -errno,
            HookError::InitRejected { .. } => -libc::EINVAL,
            HookError::AlreadyArmed => -libc::EBUSY,
        }
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookError::InitRejected { kind, errno } => write!(
                f,
                "sigaction rejected handler for {} (errno {})",
                kind.name(),
                errno
            ),
            HookError::AlreadyArmed => f.write_str("debug hooks are already armed"),
        }
    }
}

impl std::error::Error for HookError {}
