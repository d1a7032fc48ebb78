//! Crashes on purpose with the debug hooks armed.
//!
//! `pet-crash-demo segv` prints the banner and waits; follow it to attach gdb.
//! `kill -USR1 <pid>` releases the parked thread without a debugger.
//! `PET_DEBUG_HOOKS=0` runs the same fault with the hooks disabled.

use core::ffi::c_int;
use std::process::ExitCode;
use std::thread;

use clap::{Parser, ValueEnum};
use pet_debug_hooks::signal::{Disposition, LibcSignals, SignalOs};
use pet_debug_hooks::uapi::signal::SaFlags;
use pet_debug_hooks::{FaultKind, pr_err, pr_info, rendezvous};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Scenario {
    /// Write through an unmapped address
    Segv,
    /// Raise SIGILL
    Ill,
    /// Raise SIGFPE
    Fpe,
    /// Call abort()
    Abrt,
    /// Raise SIGBUS
    Bus,
}

impl Scenario {
    fn kind(self) -> FaultKind {
        match self {
            Scenario::Segv => FaultKind::InvalidMemoryAccess,
            Scenario::Ill => FaultKind::IllegalInstruction,
            Scenario::Fpe => FaultKind::ArithmeticError,
            Scenario::Abrt => FaultKind::Abort,
            Scenario::Bus => FaultKind::BusError,
        }
    }
}

/// Trigger a fault on a worker thread with the PET debug hooks armed
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Fault to trigger
    #[arg(value_enum)]
    scenario: Scenario,

    /// Clear the wait flag first: announce the fault, then chain right away
    #[arg(long)]
    no_wait: bool,
}

unsafe extern "C" fn release_on_usr1(_sig: c_int) {
    rendezvous::release();
}

/// Keeps delivering `sig` until it terminates the process.
///
/// A chained handler may return without terminating; the std runtime's
/// SIGBUS handler only resets the disposition to SIG_DFL.
fn raise_until_fatal(sig: c_int) -> ! {
    loop {
        // SAFETY: raise has no preconditions
        unsafe { libc::raise(sig) };
    }
}

fn trigger(kind: FaultKind) {
    pr_info!("triggering {} on a worker thread", kind.name());

    match kind {
        FaultKind::InvalidMemoryAccess => {
            let unmapped = core::ptr::without_provenance_mut::<u8>(0x10);
            // SAFETY: none, the write is meant to fault
            unsafe { unmapped.write_volatile(1) };
        }
        FaultKind::Abort => std::process::abort(),
        other => raise_until_fatal(other.signal()),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let kind = args.scenario.kind();

    let release = Disposition::Simple(release_on_usr1).to_action(SaFlags::RESTART);
    if let Err(errno) = LibcSignals.set(libc::SIGUSR1, &release) {
        pr_err!("cannot install the SIGUSR1 release handler (errno {})", errno);
        return ExitCode::FAILURE;
    }

    match pet_debug_hooks::init_from_env() {
        Ok(true) => {}
        Ok(false) => pr_info!("hooks disabled, {} goes to the previous disposition", kind.name()),
        Err(err) => {
            pr_err!("init failed: {}", err);
            return ExitCode::FAILURE;
        }
    }

    if args.no_wait {
        rendezvous::release();
    }

    let worker = thread::Builder::new()
        .name("faulting-worker".into())
        .spawn(move || trigger(kind));
    match worker {
        Ok(handle) => {
            let _ = handle.join();
        }
        Err(err) => {
            pr_err!("cannot spawn worker: {}", err);
            return ExitCode::FAILURE;
        }
    }

    pr_err!("{} did not terminate the process", kind.name());
    pet_debug_hooks::teardown();
    ExitCode::FAILURE
}
