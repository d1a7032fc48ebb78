//! 信号处理方式注册表
//!
//! 每个故障类型占一个槽位，保存 init 之前的处理方式。
//! 写入只发生在持有生命周期锁的 init 中，且发生在内核槽位被布防之前；
//! 故障处理函数只读，不加锁。
//!
//! teardown 恢复原处理方式后不清空槽位，仍在运行的处理函数依旧能正确转交。

use core::cell::UnsafeCell;
use core::ffi::c_int;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicBool, Ordering};

use super::disposition::Disposition;
use crate::error::HookError;
use crate::uapi::signal::{FaultKind, HOOK_SA_FLAGS};
use crate::util::sys::last_errno;
use crate::{pr_debug, pr_err};

/// 对 `sigaction(2)` 的抽象
///
/// 生产代码使用 [`LibcSignals`]；测试可以注入失败来验证回滚。
pub trait SignalOs {
    /// 读取当前处理方式，失败时返回 errno
    fn query(&self, sig: c_int) -> Result<libc::sigaction, c_int>;
    /// 设置处理方式，失败时返回 errno
    fn set(&self, sig: c_int, action: &libc::sigaction) -> Result<(), c_int>;
}

/// 直接调用 libc 的实现
#[derive(Debug, Clone, Copy, Default)]
pub struct LibcSignals;

impl SignalOs for LibcSignals {
    fn query(&self, sig: c_int) -> Result<libc::sigaction, c_int> {
        // SAFETY: act 为空表示只查询；oldact 指向本地变量
        unsafe {
            let mut action: libc::sigaction = core::mem::zeroed();
            if libc::sigaction(sig, core::ptr::null(), &mut action) != 0 {
                return Err(last_errno());
            }
            Ok(action)
        }
    }

    fn set(&self, sig: c_int, action: &libc::sigaction) -> Result<(), c_int> {
        // SAFETY: action 是完整初始化的结构体
        if unsafe { libc::sigaction(sig, action, core::ptr::null_mut()) } != 0 {
            return Err(last_errno());
        }
        Ok(())
    }
}

/// 单个故障类型的保存槽位
struct Slot {
    action: UnsafeCell<MaybeUninit<libc::sigaction>>,
    saved: AtomicBool,
}

impl Slot {
    const fn new() -> Self {
        Self {
            action: UnsafeCell::new(MaybeUninit::uninit()),
            saved: AtomicBool::new(false),
        }
    }
}

/// 处理方式注册表
///
/// # SAFE:
/// 槽位只在 init (持有生命周期锁、且本设施的处理函数尚未被该信号布防) 时写入，
/// 此后只读；`saved` 以 Release/Acquire 发布内容，因此可以实现 Sync。
pub struct HandlerRegistry {
    slots: [Slot; FaultKind::COUNT],
}

unsafe impl Sync for HandlerRegistry {}

impl HandlerRegistry {
    /// 创建空注册表
    pub const fn new() -> Self {
        Self {
            slots: [const { Slot::new() }; FaultKind::COUNT],
        }
    }

    /// 为 `kind` 安装新的处理方式，返回被替换的原处理方式
    ///
    /// 先读取并发布原处理方式，再布防内核槽位，
    /// 因此新处理函数第一次运行时一定能读到保存值。
    ///
    /// # Safety
    ///
    /// 调用方必须独占注册表 (持有生命周期锁)，
    /// 且此刻没有本设施的处理函数正在为 `kind` 运行。
    pub unsafe fn install<O: SignalOs>(
        &self,
        os: &O,
        kind: FaultKind,
        new: Disposition,
    ) -> Result<Disposition, HookError> {
        let sig = kind.signal();
        let rejected = |errno| HookError::InitRejected { kind, errno };
        let slot = &self.slots[kind.index()];

        let old = os.query(sig).map_err(rejected)?;
        // SAFETY: 由调用方保证独占
        unsafe { (*slot.action.get()).write(old) };
        slot.saved.store(true, Ordering::Release);

        if let Err(errno) = os.set(sig, &new.to_action(HOOK_SA_FLAGS)) {
            // 内核槽位未改变，撤回发布
            slot.saved.store(false, Ordering::Release);
            return Err(rejected(errno));
        }

        let old = Disposition::from_action(&old);
        pr_debug!("{}: saved {:?}, installed {:?}", kind.name(), old, new);
        Ok(old)
    }

    /// 把保存的处理方式写回内核
    ///
    /// 槽位从未保存过时不做任何事。槽位内容保持不变。
    pub fn restore<O: SignalOs>(&self, os: &O, kind: FaultKind) -> Result<(), HookError> {
        let slot = &self.slots[kind.index()];
        if !slot.saved.load(Ordering::Acquire) {
            return Ok(());
        }
        // SAFETY: saved 为真说明内容已经完整写入
        let action = unsafe { (*slot.action.get()).assume_init_ref() };
        os.set(kind.signal(), action)
            .map_err(|errno| HookError::InitRejected { kind, errno })
    }

    /// 为集合 K 中的每个类型安装 `new`
    ///
    /// 任一类型失败时，已安装的类型按相反顺序恢复，然后返回该错误。
    ///
    /// # Safety
    ///
    /// 同 [`HandlerRegistry::install`]。
    pub unsafe fn install_all<O: SignalOs>(&self, os: &O, new: Disposition) -> Result<(), HookError> {
        for (i, &kind) in FaultKind::ALL.iter().enumerate() {
            // SAFETY: 由调用方保证
            if let Err(err) = unsafe { self.install(os, kind, new) } {
                pr_err!("failed to install handler for {}: {}", kind.name(), err);
                for &installed in FaultKind::ALL[..i].iter().rev() {
                    if let Err(restore_err) = self.restore(os, installed) {
                        pr_err!("rollback of {} failed: {}", installed.name(), restore_err);
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// 恢复集合 K 中每个类型的原处理方式，失败只记录日志
    pub fn restore_all<O: SignalOs>(&self, os: &O) {
        for kind in FaultKind::ALL {
            if let Err(err) = self.restore(os, kind) {
                pr_err!("failed to restore {}: {}", kind.name(), err);
            }
        }
    }

    /// 读取 `kind` 保存的处理方式
    ///
    /// 只做原子读取与内存拷贝，可在信号处理上下文中调用。
    pub fn saved(&self, kind: FaultKind) -> Option<Disposition> {
        let slot = &self.slots[kind.index()];
        if !slot.saved.load(Ordering::Acquire) {
            return None;
        }
        // SAFETY: saved 为真说明内容已经完整写入，且 init 之后不再修改
        let action = unsafe { (*slot.action.get()).assume_init_ref() };
        Some(Disposition::from_action(action))
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::guard::{TestEnvironment, query_action};
    use crate::uapi::signal::SaFlags;
    use crate::{kassert, test_case};

    use core::cell::Cell;
    use core::ffi::c_void;

    unsafe extern "C" fn marker(_sig: c_int, _info: *mut libc::siginfo_t, _uc: *mut c_void) {
        // 不会被调用：这些测试不投递信号
    }

    unsafe extern "C" fn prior(_sig: c_int) {
        core::hint::black_box(0);
    }

    /// 为 `fail_sig` 布防 `marker` 时失败，其余调用转给 libc
    struct FailingSignals {
        fail_sig: c_int,
        sets: Cell<usize>,
    }

    impl SignalOs for FailingSignals {
        fn query(&self, sig: c_int) -> Result<libc::sigaction, c_int> {
            LibcSignals.query(sig)
        }

        fn set(&self, sig: c_int, action: &libc::sigaction) -> Result<(), c_int> {
            self.sets.set(self.sets.get() + 1);
            if sig == self.fail_sig && action.sa_sigaction == marker as libc::sighandler_t {
                return Err(libc::EINVAL);
            }
            LibcSignals.set(sig, action)
        }
    }

    fn install_prior(kind: FaultKind) {
        let action = Disposition::Simple(prior).to_action(SaFlags::empty());
        kassert!(LibcSignals.set(kind.signal(), &action).is_ok());
    }

    test_case!(test_install_returns_previous, (TestEnvironment::Serial), {
        let registry = HandlerRegistry::new();
        install_prior(FaultKind::ArithmeticError);

        let old = unsafe {
            registry.install(&LibcSignals, FaultKind::ArithmeticError, Disposition::Info(marker))
        };
        kassert!(matches!(old, Ok(Disposition::Simple(_))));

        let current = Disposition::from_action(&query_action(libc::SIGFPE));
        kassert!(current.same_as(&Disposition::Info(marker)));

        let saved = registry.saved(FaultKind::ArithmeticError);
        kassert!(saved.is_some_and(|d| d.same_as(&Disposition::Simple(prior))));
    });

    test_case!(test_restore_reinstates_saved, (TestEnvironment::Serial), {
        let registry = HandlerRegistry::new();
        install_prior(FaultKind::IllegalInstruction);

        let _ = unsafe {
            registry.install(&LibcSignals, FaultKind::IllegalInstruction, Disposition::Info(marker))
        };
        kassert!(registry.restore(&LibcSignals, FaultKind::IllegalInstruction).is_ok());

        let current = Disposition::from_action(&query_action(libc::SIGILL));
        kassert!(current.same_as(&Disposition::Simple(prior)));
        // 槽位在恢复后仍然可读
        kassert!(registry.saved(FaultKind::IllegalInstruction).is_some());
    });

    test_case!(test_unsaved_slot, {
        let registry = HandlerRegistry::new();
        kassert!(registry.saved(FaultKind::BusError).is_none());
        kassert!(registry.restore(&LibcSignals, FaultKind::BusError).is_ok());
    });

    test_case!(test_install_all_rolls_back, (TestEnvironment::Serial), {
        let registry = HandlerRegistry::new();
        let before = FaultKind::ALL.map(|kind| query_action(kind.signal()));
        let os = FailingSignals {
            fail_sig: libc::SIGFPE,
            sets: Cell::new(0),
        };

        let result = unsafe { registry.install_all(&os, Disposition::Info(marker)) };
        kassert!(
            result
                == Err(HookError::InitRejected {
                    kind: FaultKind::ArithmeticError,
                    errno: libc::EINVAL,
                })
        );
        // SEGV、ILL 安装 + FPE 失败 + 两次回滚
        kassert!(os.sets.get() == 5);

        for (kind, prev) in FaultKind::ALL.iter().zip(before.iter()) {
            let now = query_action(kind.signal());
            kassert!(now.sa_sigaction == prev.sa_sigaction);
            // glibc 会补上 SA_RESTORER，只比较已知标志位
            kassert!(SaFlags::from_raw(now.sa_flags) == SaFlags::from_raw(prev.sa_flags));
        }
        kassert!(registry.saved(FaultKind::ArithmeticError).is_none());
    });
}
