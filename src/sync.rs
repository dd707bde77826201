//! Per-instance raw mutex for the device and registry lock domains.
//!
//! [`SpinRawMutex`] plugs into `embassy_sync::blocking_mutex::Mutex` like the
//! stock raw mutexes, but every instance owns its own flag. Two devices never
//! wait on each other, and interrupts stay enabled while a bus transfer runs
//! under the lock. Pick `CriticalSectionRawMutex` instead when the same
//! device is shared with interrupt handlers.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;

/// Test-and-test-and-set spin lock usable as an embassy [`RawMutex`].
pub struct SpinRawMutex {
    locked: AtomicBool,
}

impl SpinRawMutex {
    /// Creates an unlocked mutex.
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    fn acquire(&self) -> Unlock<'_> {
        loop {
            if self
                .locked
                .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                return Unlock { flag: &self.locked };
            }

            while self.locked.load(Ordering::Relaxed) {
                core::hint::spin_loop();
            }
        }
    }
}

impl Default for SpinRawMutex {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: `lock` runs `f` only while `locked` is held by this caller, and the
// flag is cleared again on every exit path, including unwinding.
unsafe impl RawMutex for SpinRawMutex {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self::new();

    fn lock<R>(&self, f: impl FnOnce() -> R) -> R {
        let _unlock = self.acquire();
        f()
    }
}

struct Unlock<'a> {
    flag: &'a AtomicBool,
}

impl Drop for Unlock<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
