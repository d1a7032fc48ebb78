//! 异步信号安全的系统调用封装
//!
//! 这里的每个函数都只调用 POSIX 列为 async-signal-safe 的接口，
//! 可以在故障处理函数中使用。

use core::ffi::c_int;

/// 获取当前进程 ID
pub fn getpid() -> libc::pid_t {
    // SAFETY: getpid 没有前置条件
    unsafe { libc::getpid() }
}

/// 读取当前线程的 errno
///
/// `last_os_error` 只读取 errno，不分配内存。
pub fn last_errno() -> c_int {
    std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

/// 休眠指定秒数
///
/// 使用 `nanosleep` 而不是任何库层定时器。被信号打断时提前返回，
/// 调用方的轮询循环会重新检查条件，因此不需要补足剩余时间。
pub fn sleep_secs(secs: libc::time_t) {
    let req = libc::timespec {
        tv_sec: secs,
        tv_nsec: 0,
    };
    // SAFETY: req 是有效的 timespec，剩余时间不需要回填
    unsafe {
        libc::nanosleep(&req, core::ptr::null_mut());
    }
}

/// 将信号处理方式恢复为默认值，然后在当前线程重新投递该信号
///
/// 在处理函数内调用时信号仍处于屏蔽状态，因此它会在处理函数返回、
/// 屏蔽字恢复之后才以默认方式投递。
pub fn reraise_default(sig: c_int) {
    // SAFETY: 全零的 sigaction 即 SIG_DFL、空屏蔽字、无标志；
    // sigaction 与 raise 均为异步信号安全
    unsafe {
        let mut action: libc::sigaction = core::mem::zeroed();
        action.sa_sigaction = libc::SIG_DFL;
        libc::sigemptyset(&mut action.sa_mask);
        libc::sigaction(sig, &action, core::ptr::null_mut());
        libc::raise(sig);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{kassert, test_case};

    test_case!(test_getpid_matches_std, {
        kassert!(getpid() as u32 == std::process::id());
    });

    test_case!(test_sleep_zero_returns, {
        let started = std::time::Instant::now();
        sleep_secs(0);
        kassert!(started.elapsed() < std::time::Duration::from_secs(1));
    });
}
