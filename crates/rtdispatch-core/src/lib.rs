//! # rtdispatch-core
//!
//! Core types for the rtdispatch callback interpreters.
//!
//! This crate is platform-agnostic and contains no OS-specific code.
//! Semaphores, thread priority and the interpreters themselves live in
//! `rtdispatch-runtime`.
//!
//! ## Modules
//!
//! - `callback` - The `Callback` trait and closure adapters
//! - `deleter` - Pluggable disposal of executed callbacks
//! - `queue` - Lock-free MPMC callback queue
//! - `error` - Error types
//! - `kprint` - Kernel-style debug printing macros
//! - `env` - Environment variable utilities

pub mod callback;
pub mod deleter;
pub mod queue;
pub mod error;
pub mod kprint;
pub mod env;

// Re-exports for convenience
pub use callback::{callback, BoxedCallback, Callback, FnCallback};
pub use deleter::{Deleter, DropDeleter, FnDeleter, RecycleBin, RecycleDeleter};
pub use queue::CallbackQueue;
pub use error::{DispatchError, DispatchResult, PriorityError, WorkerError};
pub use env::{env_get, env_get_bool, env_get_opt, env_get_str, env_is_set};

/// Shared limits and defaults
pub mod constants {
    /// Upper bound for the default pool size; explicit counts may exceed it
    pub const MAX_WORKERS: usize = 64;

    /// Default thread name prefix; workers are named `<prefix>-<index>`
    pub const DEFAULT_THREAD_NAME: &str = "rtdispatch-worker";
}
