//! Invariant-checking mutex
//!
//! A `std::sync::Mutex` that runs a structural check on the guarded value
//! whenever the lock is taken and again just before it is released. The
//! checks only run in builds with `debug_assertions`.
//!
//! The guard is a plain synchronous guard. It is `!Send`, so a `Send` future
//! cannot hold it across an `.await`.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Mutex whose contents are validated on every acquire and release.
pub struct InvariantMutex<T> {
    inner: Mutex<T>,
    check: fn(&T),
}

impl<T> InvariantMutex<T> {
    /// Wraps `value`. `check` should panic if the value is corrupt.
    pub fn new(value: T, check: fn(&T)) -> Self {
        Self {
            inner: Mutex::new(value),
            check,
        }
    }

    /// Acquires the lock, blocking the current thread.
    ///
    /// A lock poisoned by a panicking holder is recovered; the acquire check
    /// then decides whether the state is still usable.
    pub fn lock(&self) -> InvariantGuard<'_, T> {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if cfg!(debug_assertions) {
            (self.check)(&guard);
        }

        InvariantGuard {
            guard,
            check: self.check,
        }
    }

    pub fn into_inner(self) -> T {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

/// RAII guard returned by [`InvariantMutex::lock`].
pub struct InvariantGuard<'a, T> {
    guard: MutexGuard<'a, T>,
    check: fn(&T),
}

impl<T> Deref for InvariantGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for InvariantGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T> Drop for InvariantGuard<'_, T> {
    fn drop(&mut self) {
        // A second panic during unwinding would abort the process.
        if cfg!(debug_assertions) && !std::thread::panicking() {
            (self.check)(&self.guard);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counted {
        value: i64,
        checks: AtomicUsize,
    }

    fn count_and_require_non_negative(c: &Counted) {
        c.checks.fetch_add(1, Ordering::SeqCst);
        assert!(c.value >= 0, "value went negative: {}", c.value);
    }

    #[test]
    #[cfg(debug_assertions)]
    fn test_check_runs_on_acquire_and_release() {
        let mu = InvariantMutex::new(Counted::default(), count_and_require_non_negative);

        {
            let mut guard = mu.lock();
            guard.value = 7;
        }

        let c = mu.into_inner();
        assert_eq!(c.value, 7);
        assert_eq!(c.checks.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "value went negative")]
    fn test_violation_detected_on_release() {
        let mu = InvariantMutex::new(Counted::default(), count_and_require_non_negative);
        let mut guard = mu.lock();
        guard.value = -1;
        drop(guard);
    }

    #[test]
    fn test_lock_recovers_from_poison() {
        let mu = std::sync::Arc::new(InvariantMutex::new(
            Counted::default(),
            count_and_require_non_negative,
        ));

        let mu2 = mu.clone();
        let result = std::thread::spawn(move || {
            let _guard = mu2.lock();
            panic!("holder died");
        })
        .join();
        assert!(result.is_err());

        mu.lock().value = 3;
        assert_eq!(mu.lock().value, 3);
    }
}
