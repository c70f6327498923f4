//! Counting semaphore used to park idle dispatch workers
//!
//! Every enqueued callback posts one unit; every pass of a worker loop waits
//! for one. Units posted while nobody waits are retained, so a post that
//! races ahead of a wait is never lost. Posting more units than there will
//! ever be waits is harmless.
//!
//! Platform-specific implementations use the most efficient primitive
//! available.

use std::time::Duration;

/// Counting block/wake primitive
///
/// `post()` must be callable from a real-time thread: implementations may not
/// take a lock that a waiter can hold for long.
pub trait WaitPrimitive: Send + Sync {
    /// Add one unit and wake at most one blocked waiter
    fn post(&self);

    /// Block until a unit is available, then take it
    fn wait(&self);

    /// Take a unit if one is available, without blocking
    fn try_wait(&self) -> bool;

    /// Like `wait`, but give up after `timeout`
    ///
    /// Returns `true` if a unit was taken. A timeout too large to form a
    /// deadline behaves like `wait`.
    fn wait_timeout(&self, timeout: Duration) -> bool;

    /// Units currently available (hint, may be stale)
    fn value(&self) -> usize;
}

// Platform-specific implementations
cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod futex_linux;
        pub use futex_linux::FutexSemaphore as PlatformSemaphore;
    } else {
        mod fallback;
        pub use fallback::CondvarSemaphore as PlatformSemaphore;
    }
}

/// Create a new platform-appropriate semaphore with zero units
pub fn new_semaphore() -> PlatformSemaphore {
    PlatformSemaphore::new(0)
}
