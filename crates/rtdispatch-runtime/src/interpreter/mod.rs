//! Callback interpreters
//!
//! - `base` - `InterpreterCore`: the queue + semaphore + running-flag loop
//!   shared by both front ends
//! - `single` - `CallbackInterpreter`: one serving thread, strict FIFO
//! - `pool` - `CallbackThreadPool`: N prioritized workers, joined on drop

mod base;
mod single;
mod pool;

pub use base::InterpreterCore;
pub use single::{CallbackInterpreter, INTERPRETER_THREAD_NAME};
pub use pool::CallbackThreadPool;
