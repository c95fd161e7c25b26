//! Per-pair busy flag.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::error::{AmmError, Result};

/// Non-blocking exclusion flag owned by one pair.
///
/// A second mutating call that arrives while the flag is set fails with
/// [`AmmError::Locked`] instead of waiting.  That is the only behaviour
/// that is safe when the second call comes from a transfer hook running
/// *inside* the first one on the same thread.
#[derive(Debug, Default)]
pub struct BusyFlag(AtomicBool);

impl BusyFlag {
    /// Creates a cleared flag.
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Sets the flag, returning a guard that clears it on drop.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Locked`] if the flag is already set.
    pub fn try_acquire(&self) -> Result<BusyGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map(|_| BusyGuard(&self.0))
            .map_err(|_| AmmError::Locked)
    }

    /// Returns `true` while a guard is alive.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Scoped ownership of a [`BusyFlag`].
#[derive(Debug)]
#[must_use = "the flag is cleared as soon as the guard is dropped"]
pub struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
