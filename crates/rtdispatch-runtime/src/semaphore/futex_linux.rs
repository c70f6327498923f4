//! Linux futex-based counting semaphore
//!
//! The futex word *is* the unit count, so the kernel's compare-and-sleep
//! closes the race between "saw zero units" and "went to sleep".
//!
//! When a worker waits:
//! 1. Try to take a unit with a CAS (fast path, no syscall)
//! 2. Increment the waiter count
//! 3. FUTEX_WAIT on the count (blocks only while count == 0)
//! 4. Decrement the waiter count and retry
//!
//! When posting:
//! 1. Increment the count
//! 2. FUTEX_WAKE one waiter, only if any are registered
//!
//! The post path is a single atomic add in the uncontended case, which keeps
//! `add_callback` cheap on a real-time producer.

use super::WaitPrimitive;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// Futex-backed counting semaphore
pub struct FutexSemaphore {
    /// Futex word: number of available units
    count: AtomicU32,

    /// Threads inside (or about to enter) FUTEX_WAIT
    waiters: AtomicU32,
}

impl FutexSemaphore {
    /// Create a semaphore holding `initial` units
    pub fn new(initial: u32) -> Self {
        Self {
            count: AtomicU32::new(initial),
            waiters: AtomicU32::new(0),
        }
    }

    /// Sleep while the count is zero, at most `timeout` if given
    fn futex_wait(&self, timeout: Option<Duration>) {
        let timespec = timeout.map(|d| libc::timespec {
            tv_sec: d.as_secs().min(libc::time_t::MAX as u64) as libc::time_t,
            tv_nsec: d.subsec_nanos() as libc::c_long,
        });

        let timespec_ptr = match &timespec {
            Some(ts) => ts as *const libc::timespec,
            None => std::ptr::null(),
        };

        self.waiters.fetch_add(1, Ordering::SeqCst);

        // Result is ignored: woken, timed out, EAGAIN (count changed) and
        // EINTR all lead the caller back to the CAS fast path.
        unsafe {
            libc::syscall(
                libc::SYS_futex,
                self.count.as_ptr(),
                libc::FUTEX_WAIT | libc::FUTEX_PRIVATE_FLAG,
                0u32,           // Expected value (sleep while count == 0)
                timespec_ptr,   // Relative timeout
                std::ptr::null::<u32>(),
                0u32,
            );
        }

        self.waiters.fetch_sub(1, Ordering::SeqCst);
    }

    fn futex_wake_one(&self) {
        unsafe {
            libc::syscall(
                libc::SYS_futex,
                self.count.as_ptr(),
                libc::FUTEX_WAKE | libc::FUTEX_PRIVATE_FLAG,
                1i32,           // Wake at most 1 waiter
                std::ptr::null::<libc::timespec>(),
                std::ptr::null::<u32>(),
                0u32,
            );
        }
    }
}

impl Default for FutexSemaphore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl WaitPrimitive for FutexSemaphore {
    fn post(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);

        if self.waiters.load(Ordering::SeqCst) != 0 {
            self.futex_wake_one();
        }
    }

    fn wait(&self) {
        while !self.try_wait() {
            self.futex_wait(None);
        }
    }

    fn try_wait(&self) -> bool {
        let mut current = self.count.load(Ordering::Relaxed);
        while current != 0 {
            match self.count.compare_exchange_weak(
                current,
                current - 1,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
        false
    }

    fn wait_timeout(&self, timeout: Duration) -> bool {
        // A deadline past what Instant can represent never expires
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return true;
        };
        loop {
            if self.try_wait() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            self.futex_wait(Some(remaining));
        }
    }

    fn value(&self) -> usize {
        self.count.load(Ordering::Relaxed) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_units() {
        let sem = FutexSemaphore::new(3);
        assert!(sem.try_wait());
        assert!(sem.try_wait());
        assert!(sem.try_wait());
        assert!(!sem.try_wait());
    }

    #[test]
    fn test_post_without_waiters_skips_syscall_path() {
        let sem = FutexSemaphore::new(0);
        sem.post();
        assert_eq!(sem.waiters.load(Ordering::SeqCst), 0);
        assert_eq!(sem.value(), 1);
    }

    #[test]
    fn test_huge_timeout_is_clamped() {
        let sem = FutexSemaphore::new(0);
        // Count is nonzero, so the kernel returns without sleeping
        sem.post();
        sem.futex_wait(Some(Duration::MAX));
        assert!(sem.try_wait());
        assert_eq!(sem.waiters.load(Ordering::SeqCst), 0);
    }
}
