//! Stress test - many producers, one pool
//!
//! Usage: `stress [callbacks-per-producer] [producers]`
//!
//! Pool shape comes from the environment (`RTD_WORKERS`, `RTD_REALTIME`,
//! `RTD_PRIORITY`, ...), see `PoolConfig::from_env`.

use rtdispatch::{callback, CallbackThreadPool, PoolConfig};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn main() {
    println!("=== rtdispatch Stress Test ===\n");

    let per_producer: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(100_000);
    let producers: u64 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);
    let total = per_producer * producers;

    let config = PoolConfig::from_env();
    println!(
        "Workers: {}  real-time: {}  priority: {}",
        config.num_workers, config.realtime, config.priority
    );
    println!("Enqueuing {} callbacks from {} producers...", total, producers);

    let pool = Arc::new(CallbackThreadPool::with_config(config).expect("failed to start pool"));
    let completed = Arc::new(AtomicU64::new(0));

    let start = Instant::now();
    let handles: Vec<_> = (0..producers)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let completed = Arc::clone(&completed);
            std::thread::spawn(move || {
                for _ in 0..per_producer {
                    let completed = Arc::clone(&completed);
                    pool.add_callback(callback(move || {
                        completed.fetch_add(1, Ordering::Relaxed);
                    }));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("producer panicked");
    }

    let enqueue_time = start.elapsed();
    println!("\nEnqueue time: {:?}", enqueue_time);
    println!(
        "Enqueue rate: {:.0} callbacks/sec",
        total as f64 / enqueue_time.as_secs_f64()
    );

    println!("\nWaiting for completion...");
    let run_start = Instant::now();
    loop {
        let done = completed.load(Ordering::Relaxed);
        if done >= total {
            break;
        }
        if run_start.elapsed().as_secs() > 30 {
            println!("Timeout! Only {}/{} completed", done, total);
            break;
        }
        print!("\rCompleted: {}/{}", done, total);
        std::thread::sleep(Duration::from_millis(100));
    }

    let total_time = start.elapsed();
    drop(pool);

    println!("\n\n=== Results ===");
    println!("Total callbacks: {}", total);
    println!("Completed:       {}", completed.load(Ordering::Relaxed));
    println!("Enqueue time:    {:?}", enqueue_time);
    println!("Total time:      {:?}", total_time);
    println!(
        "Throughput:      {:.0} callbacks/sec",
        total as f64 / total_time.as_secs_f64()
    );

    println!("\n=== Stress Test Complete ===");
}
