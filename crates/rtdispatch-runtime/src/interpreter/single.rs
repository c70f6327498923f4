//! Single-consumer callback interpreter
//!
//! One dedicated thread executes callbacks strictly in enqueue order. The
//! thread is either spawned with `start_thread()` or supplied by the caller,
//! who then calls `run()` on it.

use rtdispatch_core::callback::{BoxedCallback, Callback};
use rtdispatch_core::deleter::{Deleter, DropDeleter};
use rtdispatch_core::error::{DispatchResult, WorkerError};
use rtdispatch_core::kdebug;

use super::base::InterpreterCore;
use crate::semaphore::{new_semaphore, WaitPrimitive};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Default name of the thread spawned by `start_thread()`
pub const INTERPRETER_THREAD_NAME: &str = "rtdispatch-interpreter";

/// Callback interpreter served by exactly one thread
///
/// Calling `run()` from two threads at once on the same interpreter is a
/// misuse: ordering is no longer guaranteed and `terminate()` wakes only one
/// of them.
pub struct CallbackInterpreter<C: Callback = BoxedCallback, D: Deleter<C> = DropDeleter> {
    core: Arc<InterpreterCore<C, D>>,
    thread_name: String,
}

impl<C: Callback> CallbackInterpreter<C, DropDeleter> {
    /// Interpreter that drops callbacks after execution
    pub fn new() -> Self {
        Self::with_deleter(DropDeleter)
    }
}

impl<C: Callback> Default for CallbackInterpreter<C, DropDeleter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Callback, D: Deleter<C>> CallbackInterpreter<C, D> {
    /// Interpreter with a custom deletion strategy
    pub fn with_deleter(deleter: D) -> Self {
        Self {
            core: Arc::new(InterpreterCore::new(deleter)),
            thread_name: INTERPRETER_THREAD_NAME.to_string(),
        }
    }

    /// Name used for the thread spawned by `start_thread()`
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Enqueue a callback; never blocks
    #[inline]
    pub fn add_callback(&self, handle: C) {
        self.core.add_callback(handle);
    }

    /// Serve callbacks on the calling thread until `terminate()`
    pub fn run(&self) {
        self.core.run();
    }

    /// Make the serving thread leave its loop
    ///
    /// Callbacks enqueued before this call still execute; the serving thread
    /// returns once they are done. Safe to call while the thread is blocked
    /// or in the middle of a drain.
    pub fn terminate(&self) {
        self.core.request_stop();
        self.core.wake(1);
    }

    /// Spawn the serving thread
    ///
    /// Returns once the new thread is live and its loop is armed, so a
    /// `terminate()` issued right after this call cannot be missed.
    pub fn start_thread(&self) -> DispatchResult<JoinHandle<()>> {
        let core = Arc::clone(&self.core);
        let started = Arc::new(new_semaphore());
        let started_signal = Arc::clone(&started);

        core.enter();
        let handle = thread::Builder::new()
            .name(self.thread_name.clone())
            .spawn(move || {
                started_signal.post();
                kdebug!("interpreter thread started");
                core.serve();
                kdebug!("interpreter thread exiting");
            })
            .map_err(WorkerError::from)?;

        started.wait();
        Ok(handle)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.core.is_running()
    }

    /// Approximate number of queued callbacks
    #[inline]
    pub fn pending(&self) -> usize {
        self.core.pending()
    }
}

impl<C: Callback, D: Deleter<C>> Drop for CallbackInterpreter<C, D> {
    fn drop(&mut self) {
        // A detached serving thread would otherwise wait forever
        if self.core.is_running() {
            self.terminate();
        }
    }
}
