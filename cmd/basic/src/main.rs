//! Basic rtdispatch example
//!
//! Defers work from a simulated render loop to a single interpreter thread,
//! then fans a batch of jobs out to a small worker pool.
//!
//! # Environment Variables
//!
//! - `RTD_FLUSH_EPRINT=1` - Flush debug output immediately (useful for crash debugging)
//! - `RTD_LOG_LEVEL=debug` - Set log level (off, error, warn, info, debug, trace)

use rtdispatch::{callback, CallbackInterpreter, CallbackThreadPool, PoolConfig};
use rtdispatch::{kdebug, kinfo};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// RTD_LOG_LEVEL=debug RTD_FLUSH_EPRINT=1 cargo run -p rtdispatch-basic
fn main() {
    println!("=== rtdispatch Basic Example ===\n");

    // Single interpreter: strict FIFO on one dedicated thread
    let interp = CallbackInterpreter::new().thread_name("deferred");
    let handle = interp.start_thread().expect("failed to start interpreter thread");

    for block in 0..8u32 {
        // Logging and printing happen on the interpreter thread; the loop
        // only boxes the closure and enqueues it
        interp.add_callback(callback(move || {
            kdebug!("post-processing block {}", block);
            println!("[deferred] block {} handled", block);
        }));
        std::thread::sleep(Duration::from_millis(5));
    }

    interp.terminate();
    handle.join().expect("interpreter thread panicked");
    kinfo!("interpreter stopped");

    // Pool: four workers, normal scheduling
    let config = PoolConfig::new().num_workers(4).thread_name("job");
    let pool = CallbackThreadPool::with_config(config).expect("failed to start pool");

    let completed = Arc::new(AtomicUsize::new(0));
    for job in 0..12 {
        let completed = Arc::clone(&completed);
        pool.add_callback(callback(move || {
            let worker = std::thread::current();
            println!("[{}] job {}", worker.name().unwrap_or("?"), job);
            completed.fetch_add(1, Ordering::SeqCst);
        }));
    }

    // Dropping the pool runs the queued jobs, then joins the workers
    drop(pool);
    println!("\n{} job(s) completed", completed.load(Ordering::SeqCst));

    println!("\n=== Example Complete ===");
}
