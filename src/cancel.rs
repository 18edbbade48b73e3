//! Cooperative cancellation for long-running scrolls.
//!
//! The flag lives behind a `critical-section` mutex so it can be raised from
//! an interrupt handler or another core while a scroll is running.

use core::cell::Cell;

use critical_section::Mutex;

/// Shared stop flag, checked by the scrolling engine before each glyph or
/// line is placed
pub struct CancelToken {
    cancelled: Mutex<Cell<bool>>,
}

impl CancelToken {
    pub const fn new() -> Self {
        Self {
            cancelled: Mutex::new(Cell::new(false)),
        }
    }

    /// Request the running scroll to stop
    pub fn cancel(&self) {
        critical_section::with(|cs| self.cancelled.borrow(cs).set(true));
    }

    /// Re-arm the token for the next scroll
    pub fn reset(&self) {
        critical_section::with(|cs| self.cancelled.borrow(cs).set(false));
    }

    pub fn is_cancelled(&self) -> bool {
        critical_section::with(|cs| self.cancelled.borrow(cs).get())
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
