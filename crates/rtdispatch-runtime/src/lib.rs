//! # rtdispatch-runtime
//!
//! Platform-specific runtime for the rtdispatch callback interpreters.
//!
//! This crate provides:
//! - Counting semaphores (futex on Linux, condvar elsewhere)
//! - Thread scheduling priority (pthread on unix)
//! - Thread-pool configuration
//! - The single-thread and thread-pool callback interpreters

pub mod config;
pub mod semaphore;
pub mod priority;
pub mod interpreter;

// Re-exports
pub use config::PoolConfig;
pub use semaphore::{new_semaphore, PlatformSemaphore, WaitPrimitive};
pub use priority::{priority_range, OsThreadPriority, ThreadPriority};
pub use interpreter::{CallbackInterpreter, CallbackThreadPool, InterpreterCore};
