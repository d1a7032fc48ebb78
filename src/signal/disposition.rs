//! 信号处理方式
//!
//! 原始的 `sigaction` 把两种函数指针和 SIG_DFL/SIG_IGN 塞进同一个字段，
//! 这里把它解码为带标签的枚举，链式转交时按变体显式分派。

use core::ffi::{c_int, c_void};
use core::fmt;

use crate::uapi::signal::SaFlags;
use crate::util::sys::reraise_default;

/// 三参数处理函数 (SA_SIGINFO)
pub type InfoHandler = unsafe extern "C" fn(c_int, *mut libc::siginfo_t, *mut c_void);

/// 单参数处理函数
pub type SimpleHandler = unsafe extern "C" fn(c_int);

/// 某个信号的处理方式
#[derive(Clone, Copy)]
pub enum Disposition {
    /// 由操作系统执行默认动作 (对集合 K 通常是终止并转储)
    Default,
    /// 忽略信号
    Ignore,
    /// 单参数处理函数
    Simple(SimpleHandler),
    /// 接收 siginfo 与 ucontext 的三参数处理函数
    Info(InfoHandler),
}

impl Disposition {
    /// 从内核回填的 `sigaction` 解码
    pub fn from_action(action: &libc::sigaction) -> Self {
        match action.sa_sigaction {
            libc::SIG_DFL => Disposition::Default,
            libc::SIG_IGN => Disposition::Ignore,
            addr => {
                let flags = SaFlags::from_raw(action.sa_flags);
                // SAFETY: 非 DFL/IGN 的值是内核保存下来的函数地址，
                // 其签名由 SA_SIGINFO 决定
                unsafe {
                    if flags.contains(SaFlags::SIGINFO) {
                        Disposition::Info(core::mem::transmute::<libc::sighandler_t, InfoHandler>(
                            addr,
                        ))
                    } else {
                        Disposition::Simple(core::mem::transmute::<
                            libc::sighandler_t,
                            SimpleHandler,
                        >(addr))
                    }
                }
            }
        }
    }

    /// 构造可交给 `sigaction` 的结构体
    ///
    /// `flags` 中的 SIGINFO 位由变体决定，调用方传入的值会被修正。
    /// 屏蔽字为空：处理期间只屏蔽当前信号本身。
    pub fn to_action(self, flags: SaFlags) -> libc::sigaction {
        let flags = match self {
            Disposition::Info(_) => flags | SaFlags::SIGINFO,
            _ => flags - SaFlags::SIGINFO,
        };

        // SAFETY: 全零是合法的 sigaction 初值；sigemptyset 只写入本地变量
        let mut action: libc::sigaction = unsafe { core::mem::zeroed() };
        unsafe { libc::sigemptyset(&mut action.sa_mask) };
        action.sa_sigaction = self.handler_address();
        action.sa_flags = flags.to_raw();
        action
    }

    /// 写入 `sa_sigaction` 字段的原始值
    pub fn handler_address(&self) -> libc::sighandler_t {
        match self {
            Disposition::Default => libc::SIG_DFL,
            Disposition::Ignore => libc::SIG_IGN,
            Disposition::Simple(handler) => *handler as libc::sighandler_t,
            Disposition::Info(handler) => *handler as libc::sighandler_t,
        }
    }

    /// 两个处理方式是否指向同一个目标
    pub fn same_as(&self, other: &Disposition) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
            && self.handler_address() == other.handler_address()
    }

    /// 把信号转交给这个处理方式
    ///
    /// - 三参数处理函数：原样传入 `info` 与 `ucontext`
    /// - 单参数处理函数：只传信号编号
    /// - 默认：恢复 SIG_DFL 并在当前线程重新投递
    /// - 忽略：什么也不做
    ///
    /// # Safety
    ///
    /// `info` 与 `ucontext` 必须是内核投递给当前处理函数的原始指针
    /// (或者在处理方式不读取它们时为空指针)。
    pub unsafe fn dispatch(self, sig: c_int, info: *mut libc::siginfo_t, ucontext: *mut c_void) {
        match self {
            Disposition::Info(handler) => unsafe { handler(sig, info, ucontext) },
            Disposition::Simple(handler) => unsafe { handler(sig) },
            Disposition::Default => reraise_default(sig),
            Disposition::Ignore => {}
        }
    }
}

impl fmt::Debug for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposition::Default => f.write_str("SIG_DFL"),
            Disposition::Ignore => f.write_str("SIG_IGN"),
            Disposition::Simple(_) => write!(f, "Simple({:#x})", self.handler_address()),
            Disposition::Info(_) => write!(f, "Info({:#x})", self.handler_address()),
        }
    }
}
