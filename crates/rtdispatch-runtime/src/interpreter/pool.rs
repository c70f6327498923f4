//! Thread-pool callback interpreter
//!
//! N worker threads share one callback queue and one wake-up semaphore.
//! Workers are spawned in the constructor and joined in `Drop`; the count is
//! fixed for the pool's lifetime.
//!
//! Startup handshake: each worker applies its scheduling priority, then posts
//! a shared startup semaphore. The constructor waits for exactly N posts, so
//! every worker is live and prioritized by the time it returns. With
//! `strict_priority` set, a refused priority turns into a construction error
//! once all workers have reported.
//!
//! Shutdown: the running flag is cleared, then the wake-up semaphore is
//! posted N times. Each worker consumes at most one of those units before it
//! exits, so N posts are enough no matter how many workers were blocked.
//!
//! Ordering: callbacks drained by one worker run in FIFO order; there is no
//! total order across workers.

use rtdispatch_core::callback::{BoxedCallback, Callback};
use rtdispatch_core::deleter::{Deleter, DropDeleter};
use rtdispatch_core::error::{DispatchError, DispatchResult, PriorityError, WorkerError};
use rtdispatch_core::{kdebug, kerror, kinfo, kwarn};

use super::base::InterpreterCore;
use crate::config::PoolConfig;
use crate::priority::{OsThreadPriority, ThreadPriority};
use crate::semaphore::{new_semaphore, PlatformSemaphore, WaitPrimitive};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// First priority refusal reported by a worker
type Refusal = Arc<Mutex<Option<PriorityError>>>;

/// Callback interpreter served by a fixed pool of worker threads
pub struct CallbackThreadPool<C: Callback = BoxedCallback, D: Deleter<C> = DropDeleter> {
    core: Arc<InterpreterCore<C, D>>,
    handles: Vec<JoinHandle<()>>,
    config: PoolConfig,
}

impl<C: Callback> CallbackThreadPool<C, DropDeleter> {
    /// Spawn `worker_count` workers with the given scheduling class and level
    pub fn new(worker_count: usize, realtime: bool, priority: i32) -> DispatchResult<Self> {
        Self::with_config(
            PoolConfig::new()
                .num_workers(worker_count)
                .realtime(realtime)
                .priority(priority),
        )
    }

    /// Spawn workers as described by `config`
    pub fn with_config(config: PoolConfig) -> DispatchResult<Self> {
        Self::with_parts(config, DropDeleter, Arc::new(OsThreadPriority))
    }
}

impl<C: Callback, D: Deleter<C>> CallbackThreadPool<C, D> {
    /// Spawn workers with an explicit deletion strategy and priority setter
    ///
    /// Fails without leaving threads behind if the configuration is invalid
    /// or any worker cannot be spawned. A priority the OS refuses is logged
    /// and the worker keeps its inherited scheduling, unless
    /// `strict_priority` is set, in which case construction fails with
    /// `DispatchError::Priority`.
    pub fn with_parts(
        config: PoolConfig,
        deleter: D,
        priority: Arc<dyn ThreadPriority>,
    ) -> DispatchResult<Self> {
        config.validate()?;

        let core = Arc::new(InterpreterCore::new(deleter));
        let startup = Arc::new(new_semaphore());
        let refused: Refusal = Arc::new(Mutex::new(None));

        // Armed before any worker exists, so a failed construction that
        // stops the loop below can never be overridden by a late worker.
        core.enter();

        let mut pool = Self {
            core,
            handles: Vec::with_capacity(config.num_workers),
            config,
        };

        for index in 0..pool.config.num_workers {
            match pool.spawn_worker(index, &startup, &priority, &refused) {
                Ok(handle) => pool.handles.push(handle),
                Err(e) => {
                    kerror!(
                        "spawned {} of {} workers: {}",
                        index,
                        pool.config.num_workers,
                        e
                    );
                    // Drop stops and joins the workers spawned so far
                    return Err(DispatchError::Worker(e));
                }
            }
        }

        for _ in 0..pool.config.num_workers {
            startup.wait();
        }

        if pool.config.strict_priority {
            let first = refused.lock().unwrap_or_else(PoisonError::into_inner).take();
            if let Some(e) = first {
                kerror!("worker priority refused: {}", e);
                // Drop stops and joins every worker
                return Err(e.into());
            }
        }

        kinfo!(
            "callback pool started: {} workers, {} priority {}",
            pool.config.num_workers,
            if pool.config.realtime { "real-time" } else { "normal" },
            pool.config.priority
        );
        Ok(pool)
    }

    fn spawn_worker(
        &self,
        index: usize,
        startup: &Arc<PlatformSemaphore>,
        priority: &Arc<dyn ThreadPriority>,
        refused: &Refusal,
    ) -> Result<JoinHandle<()>, WorkerError> {
        let core = Arc::clone(&self.core);
        let startup = Arc::clone(startup);
        let priority = Arc::clone(priority);
        let refused = Arc::clone(refused);
        let realtime = self.config.realtime;
        let level = self.config.priority;

        let mut builder = thread::Builder::new().name(self.config.worker_name(index));
        if let Some(bytes) = self.config.stack_size {
            builder = builder.stack_size(bytes);
        }

        let handle = builder.spawn(move || {
            if let Err(e) = priority.apply(realtime, level) {
                kwarn!(
                    "worker {}: {} priority {} not applied: {}",
                    index,
                    if realtime { "real-time" } else { "normal" },
                    level,
                    e
                );
                let mut first = refused.lock().unwrap_or_else(PoisonError::into_inner);
                if first.is_none() {
                    *first = Some(e);
                }
            }
            startup.post();

            kdebug!("worker {} serving", index);
            core.serve();
            kdebug!("worker {} exiting", index);
        })?;
        Ok(handle)
    }

    /// Enqueue a callback; never blocks
    #[inline]
    pub fn add_callback(&self, handle: C) {
        self.core.add_callback(handle);
    }

    /// Number of worker threads
    #[inline]
    pub fn worker_count(&self) -> usize {
        self.config.num_workers
    }

    /// Approximate number of queued callbacks
    #[inline]
    pub fn pending(&self) -> usize {
        self.core.pending()
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Stop and join all workers, reporting whether any of them panicked
    ///
    /// Dropping the pool does the same but only logs a panic.
    pub fn shutdown(mut self) -> DispatchResult<()> {
        match self.stop_and_join() {
            0 => Ok(()),
            _ => Err(DispatchError::Worker(WorkerError::Panicked)),
        }
    }

    /// Returns the number of workers that panicked
    fn stop_and_join(&mut self) -> usize {
        if self.handles.is_empty() {
            return 0;
        }

        self.core.request_stop();
        self.core.wake(self.handles.len());

        let mut panicked = 0;
        for handle in self.handles.drain(..) {
            let name = handle.thread().name().unwrap_or("<unnamed>").to_owned();
            if handle.join().is_err() {
                kerror!("{}: {}", name, WorkerError::Panicked);
                panicked += 1;
            }
        }
        kinfo!("callback pool stopped");
        panicked
    }
}

impl<C: Callback, D: Deleter<C>> Drop for CallbackThreadPool<C, D> {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}
