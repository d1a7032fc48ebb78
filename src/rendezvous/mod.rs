//! Debugger rendezvous
//!
//! Owns the two process-wide flags the fault handler consults:
//!
//! - the **enabled gate**, set between [`crate::init`] and
//!   [`crate::teardown`]; when clear the handler passes straight through to
//!   the chained disposition.
//! - the **wait flag**, exported unmangled as `wait_for_debugger` so the
//!   operator can clear it from a debugger (`set wait_for_debugger = 0`).
//!
//! Every function here is async-signal-safe: atomics and `nanosleep` only.

pub mod banner;

use core::ffi::c_int;
use core::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};

use crate::config::POLL_INTERVAL_SECS;
use crate::util::sys::sleep_secs;

/// Name of the exported wait flag, as printed in the banner.
pub const WAIT_FLAG_SYMBOL: &str = "wait_for_debugger";

/// Non-zero means "keep the faulting thread parked".
///
/// Declared as a plain `int` so a debugger sees an integer it can assign to.
/// Rust code only touches it through [`wait_flag`], which views it as an
/// `AtomicI32`, so the polling read is never hoisted out of the loop.
#[allow(non_upper_case_globals)]
#[unsafe(no_mangle)]
#[used]
static mut wait_for_debugger: c_int = 1;

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Faults announced since load.
static FAULTS_CAUGHT: AtomicUsize = AtomicUsize::new(0);

/// Threads currently inside [`park`].
static PARKED_THREADS: AtomicUsize = AtomicUsize::new(0);

fn wait_flag() -> &'static AtomicI32 {
    // SAFETY: `c_int` and `AtomicI32` share size and alignment, the static
    // lives for the whole program, and all Rust accesses go through this view.
    unsafe { AtomicI32::from_ptr(&raw mut wait_for_debugger) }
}

/// Opens the gate. Called by init on the main thread.
pub(crate) fn enable() {
    ENABLED.store(true, Ordering::Release);
}

/// Closes the gate. Called by teardown on the main thread.
pub(crate) fn disable() {
    ENABLED.store(false, Ordering::Release);
}

/// Whether the handler should announce and park.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Acquire)
}

/// Clears the wait flag, letting parked threads continue.
///
/// Equivalent to `set wait_for_debugger = 0` from a debugger. Safe to call
/// from a signal handler, e.g. one bound to `SIGUSR1`.
pub fn release() {
    wait_flag().store(0, Ordering::Relaxed);
}

/// Sets the wait flag again so the next fault parks.
pub fn rearm() {
    wait_flag().store(1, Ordering::Relaxed);
}

/// Whether a fault arriving now would park.
pub fn is_waiting() -> bool {
    wait_flag().load(Ordering::Relaxed) != 0
}

/// Number of faults the handler has announced since the process started.
pub fn faults_caught() -> usize {
    FAULTS_CAUGHT.load(Ordering::Relaxed)
}

/// Number of threads parked right now.
pub fn parked_threads() -> usize {
    PARKED_THREADS.load(Ordering::Relaxed)
}

pub(crate) fn note_fault_caught() {
    FAULTS_CAUGHT.fetch_add(1, Ordering::Relaxed);
}

/// Blocks the calling thread until the wait flag reads zero.
///
/// Re-reads the flag on every iteration and sleeps [`POLL_INTERVAL_SECS`]
/// between reads. A signal interrupting the sleep just causes an early
/// re-check. Re-entry from a nested fault parks again on the same flag.
pub(crate) fn park() {
    PARKED_THREADS.fetch_add(1, Ordering::Relaxed);
    while wait_flag().load(Ordering::Relaxed) != 0 {
        sleep_secs(POLL_INTERVAL_SECS);
    }
    PARKED_THREADS.fetch_sub(1, Ordering::Relaxed);
}
