//! Error types for rtdispatch
//!
//! Only lifecycle operations can fail: spawning worker threads, validating a
//! pool configuration, and applying a thread priority. Enqueuing a callback
//! never fails.

use core::fmt;

/// Result type for dispatch lifecycle operations
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors that can occur while building or tearing down an interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Pool configuration rejected before any thread was spawned
    InvalidConfig(&'static str),

    /// Worker thread error
    Worker(WorkerError),

    /// Thread priority could not be applied
    Priority(PriorityError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            DispatchError::Worker(e) => write!(f, "worker error: {}", e),
            DispatchError::Priority(e) => write!(f, "priority error: {}", e),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Worker thread related errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// The OS refused to create a worker thread (carries the io error kind text)
    SpawnFailed(String),

    /// Worker thread panicked, normally inside a callback
    Panicked,
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::SpawnFailed(reason) => {
                write!(f, "failed to spawn worker thread: {}", reason)
            }
            WorkerError::Panicked => write!(f, "worker thread panicked"),
        }
    }
}

impl From<WorkerError> for DispatchError {
    fn from(e: WorkerError) -> Self {
        DispatchError::Worker(e)
    }
}

impl From<std::io::Error> for WorkerError {
    fn from(e: std::io::Error) -> Self {
        WorkerError::SpawnFailed(e.to_string())
    }
}

/// Thread priority errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityError {
    /// The process lacks the privilege for the requested scheduling class
    PermissionDenied,

    /// The level is outside the range accepted by the scheduling class
    InvalidLevel(i32),

    /// Priority control is not available on this platform
    Unsupported,

    /// Any other OS failure (errno)
    Os(i32),
}

impl fmt::Display for PriorityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityError::PermissionDenied => write!(f, "permission denied"),
            PriorityError::InvalidLevel(level) => write!(f, "invalid priority level {}", level),
            PriorityError::Unsupported => write!(f, "thread priority unsupported on this platform"),
            PriorityError::Os(errno) => write!(f, "OS error: errno {}", errno),
        }
    }
}

impl std::error::Error for PriorityError {}

impl From<PriorityError> for DispatchError {
    fn from(e: PriorityError) -> Self {
        DispatchError::Priority(e)
    }
}
