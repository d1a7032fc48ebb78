//! Operator-facing text.
//!
//! Everything here renders through [`RawWrite`] with pre-split literal
//! pieces and [`DecimalBuf`] numbers: no allocation, no `core::fmt`, no
//! locks. Safe to call from the fault handler.

use core::ffi::c_int;

use super::WAIT_FLAG_SYMBOL;
use crate::config::BANNER_RULE;
use crate::uapi::signal::signal_name;
use crate::util::{DecimalBuf, RawWrite};

/// Printed once the wait flag has been cleared.
pub const CONTINUING_LINE: &str = "Continuing after debugger attach...\n";

/// Writes the rendezvous banner for signal `sig` in process `pid`.
pub fn write_banner<W: RawWrite>(out: &mut W, sig: c_int, pid: libc::pid_t) {
    let sig_text = DecimalBuf::new(sig.into());
    let pid_text = DecimalBuf::new(pid.into());
    let pid = pid_text.as_bytes();

    out.write_raw(b"\n");
    out.write_str_raw(BANNER_RULE);
    out.write_raw(b"\n");

    out.write_raw(b"* PET: Caught signal ");
    out.write_raw(sig_text.as_bytes());
    out.write_raw(b" (");
    out.write_str_raw(signal_name(sig));
    out.write_raw(b")\n");

    out.write_raw(b"* Process ID: ");
    out.write_raw(pid);
    out.write_raw(b"\n");

    out.write_raw(b"*\n");
    out.write_raw(b"* The process is now paused so you can attach a debugger.\n");

    out.write_raw(b"* To attach GDB: gdb -p ");
    out.write_raw(pid);
    out.write_raw(b"\n");

    out.write_raw(b"* Then in GDB:   set ");
    out.write_str_raw(WAIT_FLAG_SYMBOL);
    out.write_raw(b" = 0\n");
    out.write_raw(b"*                continue\n");

    out.write_raw(b"*\n");
    out.write_raw(b"* To terminate without debugging, send SIGKILL:\n");
    out.write_raw(b"* kill -9 ");
    out.write_raw(pid);
    out.write_raw(b"\n");

    out.write_str_raw(BANNER_RULE);
    out.write_raw(b"\n");
}

/// Writes the line announcing that the hooks are armed.
pub fn write_init_notice<W: RawWrite>(out: &mut W, pid: libc::pid_t) {
    let pid_text = DecimalBuf::new(pid.into());
    out.write_raw(b"PET debug hooks initialized (PID: ");
    out.write_raw(pid_text.as_bytes());
    out.write_raw(b")\n");
}
