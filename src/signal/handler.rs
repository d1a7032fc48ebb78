//! Fault handler core
//!
//! The routine the OS runs on SIGSEGV, SIGILL, SIGFPE, SIGABRT and SIGBUS:
//!
//! 1. gate on [`rendezvous::is_enabled`], skipping to 5 when closed;
//! 2. classify the signal (anything outside the set prints as `UNKNOWN`);
//! 3. print the banner to stderr;
//! 4. park until `wait_for_debugger` reads zero;
//! 5. chain to the disposition saved at init.
//!
//! # Async-Signal-Safety
//!
//! This module ONLY calls:
//! - atomic loads/stores/RMWs (lock-free)
//! - `write(2)`, `getpid(2)`, `nanosleep(2)` through [`crate::util`]
//! - `sigaction(2)` and `raise(3)` when re-raising under the default action
//!
//! It never allocates, never locks, and keeps only a few small buffers on
//! the stack, so it fits on a minimal alternate signal stack.

use core::ffi::{c_int, c_void};

use super::disposition::Disposition;
use super::registry::HandlerRegistry;
use crate::rendezvous::{self, banner};
use crate::uapi::signal::FaultKind;
use crate::util::sys::getpid;
use crate::util::{RawWrite, Stderr};

/// Dispositions saved by init, one slot per fault kind.
pub(crate) static REGISTRY: HandlerRegistry = HandlerRegistry::new();

/// The handler installed for every fault kind.
///
/// # Safety
///
/// Meant to be invoked by the OS. Calling it directly is sound only with
/// `info`/`ucontext` that the chained disposition can accept (null works for
/// every disposition that ignores them).
pub unsafe extern "C" fn fault_handler(
    sig: c_int,
    info: *mut libc::siginfo_t,
    ucontext: *mut c_void,
) {
    if rendezvous::is_enabled() {
        announce_and_park(sig);
    }

    // SAFETY: arguments are forwarded unchanged from our own caller.
    unsafe { chain(sig, info, ucontext) };
}

fn announce_and_park(sig: c_int) {
    let mut stderr = Stderr;

    rendezvous::note_fault_caught();
    banner::write_banner(&mut stderr, sig, getpid());

    rendezvous::park();

    stderr.write_str_raw(banner::CONTINUING_LINE);
}

/// Hands the fault to whatever was installed before init.
///
/// A kind with no saved slot is treated as default. A signal outside the
/// intercepted set has nothing to chain to and returns.
unsafe fn chain(sig: c_int, info: *mut libc::siginfo_t, ucontext: *mut c_void) {
    let Some(kind) = FaultKind::from_signal(sig) else {
        return;
    };

    let mut disposition = REGISTRY.saved(kind).unwrap_or(Disposition::Default);
    // Never chain into ourselves.
    if disposition.same_as(&Disposition::Info(fault_handler)) {
        disposition = Disposition::Default;
    }

    // SAFETY: info/ucontext are the pointers the OS delivered to us.
    unsafe { disposition.dispatch(sig, info, ucontext) };
}
