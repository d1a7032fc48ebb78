//! Signal-safe number formatting

use core::fmt;

/// Base-10 rendering of an integer into a stack buffer.
///
/// `core::fmt` is not on any async-signal-safe list, so the fault handler
/// formats numbers through this instead.
#[derive(Clone, Copy)]
pub struct DecimalBuf {
    // i64::MIN is 20 bytes including the sign.
    buf: [u8; 20],
    start: usize,
}

impl DecimalBuf {
    /// Renders `n`.
    pub fn new(n: i64) -> Self {
        let mut buf = [0u8; 20];
        let mut pos = buf.len();
        let negative = n < 0;
        // Work on the magnitude as u64 so i64::MIN does not overflow.
        let mut magnitude = n.unsigned_abs();

        loop {
            pos -= 1;
            buf[pos] = b'0' + (magnitude % 10) as u8;
            magnitude /= 10;
            if magnitude == 0 {
                break;
            }
        }

        if negative {
            pos -= 1;
            buf[pos] = b'-';
        }

        Self { buf, start: pos }
    }

    /// The rendered digits.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[self.start..]
    }

    /// The rendered digits as text.
    pub fn as_str(&self) -> &str {
        // Only ASCII digits and '-' are ever written.
        core::str::from_utf8(self.as_bytes()).unwrap_or("")
    }
}

impl fmt::Display for DecimalBuf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
