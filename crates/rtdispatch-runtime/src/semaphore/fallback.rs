//! Fallback counting semaphore using std::sync::Condvar
//!
//! Used on platforms without futex support.
//! Less efficient but portable: `post` takes the mutex briefly.

use super::WaitPrimitive;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Mutex + Condvar counting semaphore
pub struct CondvarSemaphore {
    /// Available units
    count: Mutex<usize>,

    /// Signalled once per post
    condvar: Condvar,
}

impl CondvarSemaphore {
    /// Create a semaphore holding `initial` units
    pub fn new(initial: u32) -> Self {
        Self {
            count: Mutex::new(initial as usize),
            condvar: Condvar::new(),
        }
    }

    // The count stays consistent even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CondvarSemaphore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl WaitPrimitive for CondvarSemaphore {
    fn post(&self) {
        {
            let mut count = self.lock();
            *count += 1;
        }
        self.condvar.notify_one();
    }

    fn wait(&self) {
        let mut count = self.lock();
        while *count == 0 {
            count = self
                .condvar
                .wait(count)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *count -= 1;
    }

    fn try_wait(&self) -> bool {
        let mut count = self.lock();
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    fn wait_timeout(&self, timeout: Duration) -> bool {
        // A deadline past what Instant can represent never expires
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return true;
        };
        let mut count = self.lock();
        while *count == 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            let (guard, _) = self
                .condvar
                .wait_timeout(count, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            count = guard;
        }
        *count -= 1;
        true
    }

    fn value(&self) -> usize {
        *self.lock()
    }
}
