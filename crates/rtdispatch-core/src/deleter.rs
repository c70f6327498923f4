//! Deletion strategies for executed callbacks
//!
//! Once a worker has executed a callback it owns the handle and must dispose
//! of it. The interpreter is generic over a [`Deleter`] so the disposal policy
//! is chosen at construction time:
//!
//! - [`DropDeleter`] (default): drop on the worker right after execution.
//! - [`RecycleDeleter`]: park executed handles in a [`RecycleBin`] so the
//!   owner can reclaim or free them later, on a thread of its choosing.
//! - [`FnDeleter`]: any closure.
//!
//! A deleter is also used at teardown for handles that were queued but never
//! executed.

use crossbeam_queue::SegQueue;
use std::sync::Arc;

/// Disposal policy for callback handles
pub trait Deleter<C>: Send + Sync + 'static {
    /// Take ownership of a handle that will not be executed again
    fn delete(&self, handle: C);
}

/// Drop handles immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct DropDeleter;

impl<C> Deleter<C> for DropDeleter {
    #[inline]
    fn delete(&self, handle: C) {
        drop(handle);
    }
}

/// Closure-backed deletion strategy
pub struct FnDeleter<F>(pub F);

impl<C, F> Deleter<C> for FnDeleter<F>
where
    F: Fn(C) + Send + Sync + 'static,
{
    #[inline]
    fn delete(&self, handle: C) {
        (self.0)(handle)
    }
}

/// Hand executed handles back to their owner
///
/// Pushing into the bin is lock-free, so the worker never blocks on the
/// owner. Handles stay alive until the owner calls [`RecycleBin::reclaim`].
pub struct RecycleDeleter<C> {
    bin: RecycleBin<C>,
}

impl<C> RecycleDeleter<C> {
    pub fn new() -> Self {
        Self {
            bin: RecycleBin {
                slots: Arc::new(SegQueue::new()),
            },
        }
    }

    /// Owner-side view of the recycled handles
    pub fn bin(&self) -> RecycleBin<C> {
        self.bin.clone()
    }
}

impl<C> Default for RecycleDeleter<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Send + 'static> Deleter<C> for RecycleDeleter<C> {
    #[inline]
    fn delete(&self, handle: C) {
        self.bin.slots.push(handle);
    }
}

/// Shared container of handles returned by a [`RecycleDeleter`]
pub struct RecycleBin<C> {
    slots: Arc<SegQueue<C>>,
}

impl<C> Clone for RecycleBin<C> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<C> RecycleBin<C> {
    /// Take every handle recycled so far, oldest first
    pub fn reclaim(&self) -> Vec<C> {
        let mut out = Vec::with_capacity(self.slots.len());
        while let Some(handle) = self.slots.pop() {
            out.push(handle);
        }
        out
    }

    /// Number of handles waiting to be reclaimed
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_drop_deleter_drops() {
        let token = Arc::new(());
        DropDeleter.delete(Arc::clone(&token));
        assert_eq!(Arc::strong_count(&token), 1);
    }

    #[test]
    fn test_fn_deleter_counts() {
        let deleted = Arc::new(AtomicUsize::new(0));
        let d = Arc::clone(&deleted);
        let deleter = FnDeleter(move |_: u32| {
            d.fetch_add(1, Ordering::SeqCst);
        });
        deleter.delete(1u32);
        deleter.delete(2u32);
        assert_eq!(deleted.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_recycle_bin_keeps_ownership_until_reclaim() {
        let deleter = RecycleDeleter::new();
        let bin = deleter.bin();
        let token = Arc::new(());

        deleter.delete(Arc::clone(&token));
        deleter.delete(Arc::clone(&token));
        assert_eq!(bin.len(), 2);
        assert_eq!(Arc::strong_count(&token), 3);

        let reclaimed = bin.reclaim();
        assert_eq!(reclaimed.len(), 2);
        assert!(bin.is_empty());
        drop(reclaimed);
        assert_eq!(Arc::strong_count(&token), 1);
    }

    #[test]
    fn test_recycle_order_is_fifo() {
        let deleter = RecycleDeleter::new();
        let bin = deleter.bin();
        for i in 0..5u32 {
            deleter.delete(i);
        }
        assert_eq!(bin.reclaim(), vec![0, 1, 2, 3, 4]);
    }
}
