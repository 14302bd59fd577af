//! Column interrupt signal.
//!
//! The column interrupt handler must not touch the matrix, the driver or the
//! queue while a scan may be in progress, so its only job is to raise an
//! [`InterruptFlag`]. The matrix clears the flag right before it arms the
//! interrupt and reads it right after it disarms it, which ties every wake-up
//! to the sleep it interrupted.

use core::sync::atomic::{AtomicBool, Ordering};

/// Single-slot "a column edge happened" signal.
///
/// Only atomic loads and stores are used, so the flag also works on cores
/// without compare-and-swap (thumbv6m).
pub struct InterruptFlag {
    raised: AtomicBool,
}

impl Default for InterruptFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptFlag {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Raise the flag. This is the only thing the column interrupt handler does.
    #[inline]
    pub fn signal(&self) {
        self.raised.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}
