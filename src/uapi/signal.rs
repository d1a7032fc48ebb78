//! 信号相关常量与故障类型定义
//!
//! 这里的定义直接映射到宿主平台的 ABI (通过 `libc`)，
//! 供注册表和故障处理函数共同使用。

use core::ffi::c_int;

use bitflags::bitflags;

// --- 信号处理行为标志 (SA_FLAGS) ---
// 用于 struct sigaction 的 sa_flags 字段。取值随平台不同，因此从 libc 读取。
bitflags! {
    /// 信号处理行为标志，用于 sigaction 系统调用。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct SaFlags: u32 {
        /// 使用 siginfo_t 结构体传递信号详细信息 (三参数处理器)。
        const SIGINFO = libc::SA_SIGINFO as u32;

        /// 表示将使用已注册的备用信号栈 (sigaltstack)。
        const ONSTACK = libc::SA_ONSTACK as u32;

        /// 被中断的慢速系统调用在处理函数返回后自动重新启动。
        const RESTART = libc::SA_RESTART as u32;

        /// 信号投递后，处理函数被重置为 SIG_DFL。
        const RESETHAND = libc::SA_RESETHAND as u32;
    }
}

impl SaFlags {
    /// 从原始的 `sa_flags` 字段解析，忽略未知位 (例如 glibc 的 SA_RESTORER)。
    pub fn from_raw(raw: c_int) -> Self {
        Self::from_bits_truncate(raw as u32)
    }

    /// 转换为可写入 `sa_flags` 的原始值
    pub fn to_raw(self) -> c_int {
        self.bits() as c_int
    }
}

/// 本设施安装处理函数时使用的标志
///
/// 需要 `SIGINFO` 以接收 siginfo 与 ucontext 并原样转交；
/// 需要 `ONSTACK` 以便在备用信号栈上处理栈溢出类故障。
pub const HOOK_SA_FLAGS: SaFlags = SaFlags::SIGINFO.union(SaFlags::ONSTACK);

/// 被拦截的故障类型 (集合 K)
///
/// 全部是同步、定向到线程的致命信号。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// 非法内存访问 (SIGSEGV)
    InvalidMemoryAccess,
    /// 非法指令 (SIGILL)
    IllegalInstruction,
    /// 算术错误 (SIGFPE)
    ArithmeticError,
    /// 进程中止 (SIGABRT)
    Abort,
    /// 总线错误 (SIGBUS)
    BusError,
}

impl FaultKind {
    /// 拦截集合中的故障类型数量
    pub const COUNT: usize = 5;

    /// 全部故障类型，按安装顺序排列
    pub const ALL: [FaultKind; Self::COUNT] = [
        FaultKind::InvalidMemoryAccess,
        FaultKind::IllegalInstruction,
        FaultKind::ArithmeticError,
        FaultKind::Abort,
        FaultKind::BusError,
    ];

    /// 对应的信号编号
    pub const fn signal(self) -> c_int {
        match self {
            FaultKind::InvalidMemoryAccess => libc::SIGSEGV,
            FaultKind::IllegalInstruction => libc::SIGILL,
            FaultKind::ArithmeticError => libc::SIGFPE,
            FaultKind::Abort => libc::SIGABRT,
            FaultKind::BusError => libc::SIGBUS,
        }
    }

    /// 信号的符号名
    pub const fn name(self) -> &'static str {
        match self {
            FaultKind::InvalidMemoryAccess => "SIGSEGV",
            FaultKind::IllegalInstruction => "SIGILL",
            FaultKind::ArithmeticError => "SIGFPE",
            FaultKind::Abort => "SIGABRT",
            FaultKind::BusError => "SIGBUS",
        }
    }

    /// 在注册表中的槽位下标
    pub const fn index(self) -> usize {
        match self {
            FaultKind::InvalidMemoryAccess => 0,
            FaultKind::IllegalInstruction => 1,
            FaultKind::ArithmeticError => 2,
            FaultKind::Abort => 3,
            FaultKind::BusError => 4,
        }
    }

    /// 由信号编号反查故障类型，不在集合 K 中时返回 `None`
    ///
    /// 该函数只做比较，可在信号处理上下文中调用。
    pub fn from_signal(sig: c_int) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.signal() == sig)
    }
}

/// 集合 K 之外的信号使用的名字
pub const UNKNOWN_SIGNAL_NAME: &str = "UNKNOWN";

/// 信号编号对应的符号名，未知信号返回 `"UNKNOWN"`
pub fn signal_name(sig: c_int) -> &'static str {
    match FaultKind::from_signal(sig) {
        Some(kind) => kind.name(),
        None => UNKNOWN_SIGNAL_NAME,
    }
}
