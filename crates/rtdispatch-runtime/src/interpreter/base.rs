//! Shared run loop: callback queue + counting semaphore + running flag
//!
//! Loop states:
//!
//! ```text
//!            post()                  running == true
//!   Idle ─────────────► Running ─────────────────────► Idle
//!  (wait)              (drain)
//!                         │ running == false
//!                         ▼
//!                   final drain ──► Terminated
//! ```
//!
//! Each `add_callback` posts exactly one unit even though one drain may
//! consume several callbacks. The surplus units make a later wake-up find an
//! empty queue, which is harmless.

use rtdispatch_core::callback::Callback;
use rtdispatch_core::deleter::{Deleter, DropDeleter};
use rtdispatch_core::queue::CallbackQueue;
use rtdispatch_core::ktrace;

use crate::semaphore::{new_semaphore, PlatformSemaphore, WaitPrimitive};
use std::sync::atomic::{AtomicBool, Ordering};

/// Queue, wake-up semaphore and running flag shared by all consumer threads
pub struct InterpreterCore<C: Callback, D: Deleter<C> = DropDeleter> {
    queue: CallbackQueue<C>,
    sem: PlatformSemaphore,
    running: AtomicBool,
    deleter: D,
}

impl<C: Callback, D: Deleter<C>> InterpreterCore<C, D> {
    pub fn new(deleter: D) -> Self {
        Self {
            queue: CallbackQueue::new(),
            sem: new_semaphore(),
            running: AtomicBool::new(false),
            deleter,
        }
    }

    /// Enqueue a callback and post one wake-up unit
    ///
    /// Never blocks and never executes the callback on the calling thread.
    #[inline]
    pub fn add_callback(&self, handle: C) {
        self.queue.push(handle);
        self.sem.post();
    }

    /// Consumer entry point: serve callbacks until termination is requested
    pub fn run(&self) {
        self.enter();
        self.serve();
    }

    /// Execute and dispose of every callback queued right now
    ///
    /// Returns the number executed.
    pub fn drain_and_run(&self) -> usize {
        self.queue.drain(|mut handle| {
            handle.execute();
            self.deleter.delete(handle);
        })
    }

    /// Mark the loop as running
    #[inline]
    pub(crate) fn enter(&self) {
        self.running.store(true, Ordering::Relaxed);
    }

    /// The loop proper; `enter()` must have been called
    pub(crate) fn serve(&self) {
        loop {
            self.sem.wait();
            if self.drain_and_run() == 0 {
                ktrace!("empty wake-up");
            }
            // Acquire pairs with request_stop(): a false read also makes
            // every callback queued before the stop request visible.
            if !self.running.load(Ordering::Acquire) {
                break;
            }
        }
        self.drain_and_run();
    }

    /// Ask consumers to leave the loop after their current drain
    ///
    /// Blocked consumers only notice after a `wake`.
    #[inline]
    pub(crate) fn request_stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Post `n` extra wake-up units
    #[inline]
    pub(crate) fn wake(&self, n: usize) {
        for _ in 0..n {
            self.sem.post();
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Approximate number of queued callbacks
    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl<C: Callback, D: Deleter<C>> Drop for InterpreterCore<C, D> {
    fn drop(&mut self) {
        // Callbacks that were accepted but never executed
        while let Some(handle) = self.queue.pop() {
            self.deleter.delete(handle);
        }
    }
}
