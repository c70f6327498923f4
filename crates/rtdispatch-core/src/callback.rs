//! Callback handles
//!
//! A callback is an owned unit of deferred work. Producers move it into an
//! interpreter; exactly one consumer thread executes it and then hands it to
//! the interpreter's [`Deleter`](crate::deleter::Deleter).

use core::fmt;

/// An opaque unit of work with a single entry point
///
/// `execute` runs on a dispatch worker thread, never on the producer.
/// Panics escaping `execute` are not caught by the interpreter and take the
/// worker thread down with them.
pub trait Callback: Send + 'static {
    /// Run the deferred work
    fn execute(&mut self);
}

impl<T: Callback + ?Sized> Callback for Box<T> {
    #[inline]
    fn execute(&mut self) {
        (**self).execute()
    }
}

/// Type-erased, heap-allocated callback: the default handle type
pub type BoxedCallback = Box<dyn Callback>;

/// Adapts a closure to the [`Callback`] trait
pub struct FnCallback<F>(pub F);

impl<F> Callback for FnCallback<F>
where
    F: FnMut() + Send + 'static,
{
    #[inline]
    fn execute(&mut self) {
        (self.0)()
    }
}

impl<F> fmt::Debug for FnCallback<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCallback")
            .field("type", &core::any::type_name::<F>())
            .finish()
    }
}

/// Box a closure into a [`BoxedCallback`]
///
/// ```ignore
/// interpreter.add_callback(callback(move || counter.fetch_add(1, Ordering::Relaxed)));
/// ```
#[inline]
pub fn callback<F>(f: F) -> BoxedCallback
where
    F: FnMut() + Send + 'static,
{
    Box::new(FnCallback(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counter(Arc<AtomicUsize>);

    impl Callback for Counter {
        fn execute(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_closure_callback() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let mut cb = callback(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });
        cb.execute();
        cb.execute();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_boxed_struct_callback() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut cb: BoxedCallback = Box::new(Counter(Arc::clone(&hits)));
        cb.execute();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_debug_names_closure_type() {
        let cb = FnCallback(|| {});
        assert!(format!("{:?}", cb).starts_with("FnCallback"));
    }
}
