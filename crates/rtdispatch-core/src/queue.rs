//! Lock-free callback queue
//!
//! Unbounded MPMC FIFO built on `crossbeam_queue::SegQueue`.
//!
//! - `push` never blocks and never fails, so it is safe to call from a
//!   real-time producer (an audio render callback, for example). It may
//!   allocate a new segment every 31 pushes.
//! - `drain` takes every item present when it starts, in FIFO order. Items
//!   pushed while a drain is running are left for the next drain; each of
//!   them comes with its own wake-up signal, so nothing is stranded.
//! - Several consumers may drain concurrently. Every item is popped by
//!   exactly one of them; FIFO order only holds within one drain batch.

use crossbeam_queue::SegQueue;

/// Queue of pending callback handles
pub struct CallbackQueue<C> {
    items: SegQueue<C>,
}

impl<C> CallbackQueue<C> {
    pub fn new() -> Self {
        Self {
            items: SegQueue::new(),
        }
    }

    /// Append a handle at the tail
    #[inline]
    pub fn push(&self, handle: C) {
        self.items.push(handle);
    }

    /// Pop a single handle from the head
    #[inline]
    pub fn pop(&self) -> Option<C> {
        self.items.pop()
    }

    /// Pop everything that was queued when the drain started
    ///
    /// Returns the number of handles passed to `f`. A concurrent drain on
    /// another thread may take part of the snapshot, in which case this one
    /// stops early.
    pub fn drain<F>(&self, mut f: F) -> usize
    where
        F: FnMut(C),
    {
        let snapshot = self.items.len();
        let mut drained = 0;
        while drained < snapshot {
            match self.items.pop() {
                Some(handle) => {
                    f(handle);
                    drained += 1;
                }
                None => break,
            }
        }
        drained
    }

    /// Approximate number of queued handles
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<C> Default for CallbackQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[test]
    fn test_drain_is_fifo() {
        let q = CallbackQueue::new();
        for i in 0..100u32 {
            q.push(i);
        }
        let mut seen = Vec::new();
        assert_eq!(q.drain(|i| seen.push(i)), 100);
        assert_eq!(seen, (0..100).collect::<Vec<_>>());
        assert!(q.is_empty());
    }

    #[test]
    fn test_drain_empty_queue() {
        let q: CallbackQueue<u32> = CallbackQueue::new();
        assert_eq!(q.drain(|_| panic!("nothing queued")), 0);
    }

    #[test]
    fn test_drain_stops_at_snapshot() {
        let q = Arc::new(CallbackQueue::new());
        q.push(1u32);
        q.push(2u32);

        // Items pushed from inside the drain belong to the next batch
        let q2 = Arc::clone(&q);
        let mut seen = Vec::new();
        let n = q.drain(|i| {
            seen.push(i);
            q2.push(i + 10);
        });
        assert_eq!(n, 2);
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_concurrent_push_and_drain_loses_nothing() {
        const PRODUCERS: u32 = 4;
        const PER_PRODUCER: u32 = 2_000;

        let q = Arc::new(CallbackQueue::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let q = Arc::clone(&q);
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        q.push(p * PER_PRODUCER + i);
                    }
                })
            })
            .collect();

        let consumers: Vec<_> = (0..2)
            .map(|_| {
                let q = Arc::clone(&q);
                let seen = Arc::clone(&seen);
                thread::spawn(move || {
                    let mut local = Vec::new();
                    for _ in 0..1_000 {
                        q.drain(|i| local.push(i));
                        thread::yield_now();
                    }
                    seen.lock().unwrap().extend(local);
                })
            })
            .collect();

        for p in producers {
            p.join().unwrap();
        }
        for c in consumers {
            c.join().unwrap();
        }

        let mut seen = Arc::try_unwrap(seen).unwrap().into_inner().unwrap();
        q.drain(|i| seen.push(i));

        let total = (PRODUCERS * PER_PRODUCER) as usize;
        assert_eq!(seen.len(), total);
        let unique: HashSet<_> = seen.into_iter().collect();
        assert_eq!(unique.len(), total);
    }
}
