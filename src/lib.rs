//! Crash-time debugger rendezvous
//!
//! Arming the hooks replaces the process dispositions of SIGSEGV, SIGILL,
//! SIGFPE, SIGABRT and SIGBUS. When one of them arrives the faulting thread
//! prints a banner with the PID, then sleeps until someone clears the exported
//! `wait_for_debugger` variable (normally from gdb after attaching). After
//! that the signal is handed to whatever disposition was installed before,
//! so a default action still terminates the process with the expected signal.
//!
//! ```no_run
//! fn main() {
//!     pet_debug_hooks::init_from_env().ok();
//!     // ... run the program; any crash now waits for a debugger ...
//!     pet_debug_hooks::teardown();
//! }
//! ```
//!
//! C programs link the `staticlib` build and call
//! `pet_debug_hooks_init()` / `pet_debug_hooks_cleanup()`
//! (see `include/pet_debug_hooks.h`).

#[macro_use]
pub mod log;
pub mod config;
pub mod error;
pub mod rendezvous;
pub mod signal;
pub mod uapi;
pub mod util;

#[cfg(test)]
mod test;

use core::ffi::c_int;

use spin::Mutex;

pub use config::Config;
pub use error::HookError;
pub use uapi::signal::FaultKind;

use rendezvous::banner;
use signal::handler::{REGISTRY, fault_handler};
use signal::{Disposition, LibcSignals};
use util::Stderr;
use util::sys::getpid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Unarmed,
    Armed,
}

/// Serializes init and teardown. Never taken by the fault handler.
static LIFECYCLE: Mutex<Lifecycle> = Mutex::new(Lifecycle::Unarmed);

/// Arms the hooks for every fault kind.
///
/// Saves each prior disposition before installing ours and prints
/// `PET debug hooks initialized (PID: <pid>)` to stderr.
///
/// # Errors
///
/// - [`HookError::AlreadyArmed`] when called twice without a teardown in
///   between. The dispositions saved by the first call are kept.
/// - [`HookError::InitRejected`] when the OS refuses one kind. Kinds already
///   installed are rolled back and the hooks stay unarmed.
pub fn init() -> Result<(), HookError> {
    let mut state = LIFECYCLE.lock();
    if *state == Lifecycle::Armed {
        pr_warn!("init called while armed, keeping the saved dispositions");
        return Err(HookError::AlreadyArmed);
    }

    rendezvous::enable();
    // SAFETY: the lifecycle lock is held and our handler is not armed for any
    // kind while unarmed
    let installed = unsafe { REGISTRY.install_all(&LibcSignals, Disposition::Info(fault_handler)) };
    if let Err(err) = installed {
        rendezvous::disable();
        return Err(err);
    }

    *state = Lifecycle::Armed;
    banner::write_init_notice(&mut Stderr, getpid());
    Ok(())
}

/// Applies `config`, then arms the hooks unless it disables them.
///
/// Returns whether the hooks were armed by this call.
pub fn init_with(config: &Config) -> Result<bool, HookError> {
    log::set_global_level(config.log_level);

    if !config.enabled {
        pr_info!("disabled by {}", config::ENV_ENABLE);
        return Ok(false);
    }

    init().map(|()| true)
}

/// [`init_with`] using [`Config::from_env`].
pub fn init_from_env() -> Result<bool, HookError> {
    init_with(&Config::from_env())
}

/// Reinstates the saved dispositions and closes the gate.
///
/// Does nothing when unarmed. Must not be called while a thread is still
/// inside the fault handler; the saved slots stay readable so such a thread
/// still chains correctly, but the process is left without our hooks.
pub fn teardown() {
    let mut state = LIFECYCLE.lock();
    if *state == Lifecycle::Unarmed {
        return;
    }

    REGISTRY.restore_all(&LibcSignals);
    rendezvous::disable();
    *state = Lifecycle::Unarmed;
    pr_debug!("saved dispositions restored");
}

/// Whether [`init`] has succeeded without a later [`teardown`].
pub fn is_armed() -> bool {
    *LIFECYCLE.lock() == Lifecycle::Armed
}

/// C entry point for [`init_from_env`]
///
/// Returns 0 on success (including when disabled through the environment),
/// otherwise a negative errno.
#[unsafe(no_mangle)]
pub extern "C" fn pet_debug_hooks_init() -> c_int {
    match init_from_env() {
        Ok(_) => 0,
        Err(err) => err.to_errno(),
    }
}

/// C entry point for [`teardown`]
#[unsafe(no_mangle)]
pub extern "C" fn pet_debug_hooks_cleanup() {
    teardown();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalOs;
    use crate::test::guard::{TestEnvironment, query_action};
    use crate::uapi::signal::SaFlags;
    use crate::{kassert, test_case};

    use core::ffi::c_void;
    use core::sync::atomic::{AtomicUsize, Ordering};

    static ILL_HITS: AtomicUsize = AtomicUsize::new(0);
    static FPE_HITS: AtomicUsize = AtomicUsize::new(0);
    static ONE_ARG_HITS: AtomicUsize = AtomicUsize::new(0);
    static THREE_ARG_HITS: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn count_ill(_sig: c_int) {
        ILL_HITS.fetch_add(1, Ordering::SeqCst);
    }

    unsafe extern "C" fn count_fpe(_sig: c_int) {
        FPE_HITS.fetch_add(1, Ordering::SeqCst);
    }

    unsafe extern "C" fn one_arg(_sig: c_int) {
        ONE_ARG_HITS.fetch_add(1, Ordering::SeqCst);
    }

    unsafe extern "C" fn three_arg(_sig: c_int, _info: *mut libc::siginfo_t, _uc: *mut c_void) {
        THREE_ARG_HITS.fetch_add(1, Ordering::SeqCst);
    }

    fn set_prior(sig: c_int, prior: Disposition, flags: SaFlags) {
        kassert!(LibcSignals.set(sig, &prior.to_action(flags)).is_ok());
    }

    fn current(sig: c_int) -> Disposition {
        Disposition::from_action(&query_action(sig))
    }

    test_case!(test_init_arms_every_kind, (TestEnvironment::Serial), {
        kassert!(!is_armed());
        kassert!(init().is_ok());
        kassert!(is_armed());
        kassert!(rendezvous::is_enabled());

        for kind in FaultKind::ALL {
            let action = query_action(kind.signal());
            kassert!(Disposition::from_action(&action).same_as(&Disposition::Info(fault_handler)));
            kassert!(SaFlags::from_raw(action.sa_flags).contains(SaFlags::SIGINFO | SaFlags::ONSTACK));
        }
    });

    test_case!(test_round_trip_restoration, (TestEnvironment::Serial), {
        let priors = [
            (FaultKind::InvalidMemoryAccess, Disposition::Default),
            (FaultKind::IllegalInstruction, Disposition::Ignore),
            (FaultKind::ArithmeticError, Disposition::Simple(one_arg)),
            (FaultKind::BusError, Disposition::Info(three_arg)),
        ];
        for (kind, prior) in priors {
            set_prior(kind.signal(), prior, SaFlags::RESTART);
        }

        kassert!(init().is_ok());
        teardown();

        for (kind, prior) in priors {
            let action = query_action(kind.signal());
            kassert!(Disposition::from_action(&action).same_as(&prior));
            kassert!(SaFlags::from_raw(action.sa_flags).contains(SaFlags::RESTART));
        }
    });

    test_case!(test_chains_to_counting_handler, (TestEnvironment::Serial), {
        set_prior(libc::SIGILL, Disposition::Simple(count_ill), SaFlags::empty());
        kassert!(init().is_ok());
        rendezvous::release();
        let before = ILL_HITS.load(Ordering::SeqCst);

        // SAFETY: SIGILL goes to our handler, which chains to count_ill
        unsafe { libc::raise(libc::SIGILL) };

        kassert!(ILL_HITS.load(Ordering::SeqCst) == before + 1);
    });

    test_case!(test_gate_off_after_teardown, (TestEnvironment::Serial), {
        kassert!(init().is_ok());
        teardown();
        kassert!(!rendezvous::is_enabled());
        set_prior(libc::SIGFPE, Disposition::Simple(count_fpe), SaFlags::empty());

        let caught = rendezvous::faults_caught();
        let before = FPE_HITS.load(Ordering::SeqCst);
        // the wait flag is still set: reaching our handler would park forever
        unsafe { libc::raise(libc::SIGFPE) };

        kassert!(FPE_HITS.load(Ordering::SeqCst) == before + 1);
        kassert!(rendezvous::faults_caught() == caught);
    });

    test_case!(test_teardown_is_idempotent, (TestEnvironment::Serial), {
        set_prior(libc::SIGBUS, Disposition::Simple(one_arg), SaFlags::empty());
        teardown();
        kassert!(current(libc::SIGBUS).same_as(&Disposition::Simple(one_arg)));

        kassert!(init().is_ok());
        teardown();
        teardown();
        kassert!(!is_armed());
        kassert!(current(libc::SIGBUS).same_as(&Disposition::Simple(one_arg)));
    });

    test_case!(test_double_init_keeps_original, (TestEnvironment::Serial), {
        set_prior(libc::SIGABRT, Disposition::Info(three_arg), SaFlags::empty());
        kassert!(init().is_ok());
        kassert!(init() == Err(HookError::AlreadyArmed));
        kassert!(is_armed());

        teardown();
        kassert!(current(libc::SIGABRT).same_as(&Disposition::Info(three_arg)));
    });

    test_case!(test_init_with_disabled_config, (TestEnvironment::Serial), {
        let config = Config {
            enabled: false,
            log_level: log::LogLevel::Info,
        };
        kassert!(init_with(&config) == Ok(false));
        kassert!(!is_armed());
        kassert!(!rendezvous::is_enabled());

        kassert!(init_with(&Config::default()) == Ok(true));
        kassert!(is_armed());
    });

    test_case!(test_c_entry_points, (TestEnvironment::Serial), {
        kassert!(init().is_ok());
        kassert!(pet_debug_hooks_init() == -libc::EBUSY);
        pet_debug_hooks_cleanup();
        kassert!(!is_armed());
    });
}
