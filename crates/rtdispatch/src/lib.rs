//! # rtdispatch - Real-time safe callback dispatch
//!
//! Hand deferred work from a thread that must never block (an audio render
//! callback, a control thread) to dedicated worker threads.
//!
//! ## Features
//!
//! - **Non-blocking producers**: `add_callback` is a lock-free push plus a
//!   semaphore post; it never waits for a consumer
//! - **No busy-waiting**: idle workers sleep on a futex-backed semaphore and
//!   wake as soon as work arrives
//! - **Exactly once**: every callback is executed by exactly one worker, then
//!   handed to a pluggable deletion strategy
//! - **Single consumer or pool**: strict FIFO on one thread, or N workers
//!   with synchronized startup and real-time scheduling
//!
//! ## Quick Start
//!
//! ```ignore
//! use rtdispatch::{callback, CallbackInterpreter, CallbackThreadPool};
//!
//! fn main() {
//!     // One serving thread, strict enqueue order
//!     let interp = CallbackInterpreter::new();
//!     let handle = interp.start_thread().unwrap();
//!     interp.add_callback(callback(|| println!("deferred work")));
//!     interp.terminate();
//!     handle.join().unwrap();
//!
//!     // Four workers, real-time class, priority 70
//!     let pool = CallbackThreadPool::new(4, true, 70).unwrap();
//!     for i in 0..16 {
//!         pool.add_callback(callback(move || println!("job {}", i)));
//!     }
//!     drop(pool); // runs what is queued, then joins every worker
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Producers (any thread)                     │
//! │                      add_callback()                         │
//! └─────────────────────────────────────────────────────────────┘
//!                 │ push                  │ post
//!                 ▼                       ▼
//!    ┌─────────────────────────┐  ┌─────────────────────────┐
//!    │     CallbackQueue       │  │   Counting semaphore    │
//!    │   lock-free MPMC FIFO   │  │   futex / condvar       │
//!    └─────────────────────────┘  └─────────────────────────┘
//!                 │ drain                 │ wait
//!          ┌──────┴────────────┬──────────┴────────┐
//!          ▼                   ▼                   ▼
//!    ┌───────────┐      ┌───────────┐      ┌───────────┐
//!    │  Worker   │      │  Worker   │      │  Worker   │
//!    │ execute() │      │ execute() │      │ execute() │
//!    │ delete()  │      │ delete()  │      │ delete()  │
//!    └───────────┘      └───────────┘      └───────────┘
//! ```

// Re-export core types
pub use rtdispatch_core::{
    callback,
    BoxedCallback,
    Callback,
    FnCallback,
    Deleter,
    DropDeleter,
    FnDeleter,
    RecycleBin,
    RecycleDeleter,
    CallbackQueue,
    DispatchError,
    DispatchResult,
    PriorityError,
    WorkerError,
};

// Re-export kprint macros for debug logging
pub use rtdispatch_core::{kprintln, kerror, kwarn, kinfo, kdebug, ktrace};
pub use rtdispatch_core::kprint::{LogLevel, init as init_logging, set_log_level, set_flush_enabled};

// Re-export env utilities
pub use rtdispatch_core::{env_get, env_get_bool, env_get_opt, env_get_str, env_is_set};
pub use rtdispatch_core::constants::MAX_WORKERS;

// Re-export runtime types
pub use rtdispatch_runtime::{
    new_semaphore,
    priority_range,
    CallbackInterpreter,
    CallbackThreadPool,
    InterpreterCore,
    OsThreadPriority,
    PlatformSemaphore,
    PoolConfig,
    ThreadPriority,
    WaitPrimitive,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_pool_of_four_with_eight_producers() {
        let pool: Arc<CallbackThreadPool> =
            Arc::new(CallbackThreadPool::new(4, false, 0).expect("pool"));
        let counter = Arc::new(AtomicUsize::new(0));

        let producers: Vec<_> = (0..8)
            .map(|_| {
                let pool = Arc::clone(&pool);
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..125 {
                        let counter = Arc::clone(&counter);
                        pool.add_callback(callback(move || {
                            counter.fetch_add(1, Ordering::SeqCst);
                        }));
                    }
                })
            })
            .collect();
        for p in producers {
            p.join().expect("producer");
        }

        let deadline = Instant::now() + Duration::from_secs(10);
        while pool.pending() != 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(pool.pending(), 0);

        let pool = Arc::try_unwrap(pool).ok().expect("sole owner");
        pool.shutdown().expect("clean shutdown");
        assert_eq!(counter.load(Ordering::SeqCst), 1000);
    }

    #[test]
    fn test_single_thread_start_and_immediate_terminate() {
        let interp: CallbackInterpreter = CallbackInterpreter::new();
        let handle = interp.start_thread().expect("spawn");
        interp.terminate();
        handle.join().expect("join");
    }
}
