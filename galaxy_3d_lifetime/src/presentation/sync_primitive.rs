/// Binary semaphore with a crossing counter
///
/// The device never tells us whether a binary semaphore is signaled, so the
/// host tracks it: every operation that signals or waits on the semaphore
/// bumps the counter by one. An even count means the last operation was a
/// wait (the semaphore may be handed to the next signaling operation), an odd
/// count means it was a signal (a wait is still owed).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Binary semaphore handle plus its host-side crossing counter
pub struct BinarySemaphore<S> {
    handle: S,
    crossings: AtomicU64,
}

impl<S> BinarySemaphore<S> {
    /// Wrap a freshly created (unsignaled) semaphore
    pub fn new(handle: S) -> Self {
        Self {
            handle,
            crossings: AtomicU64::new(0),
        }
    }

    /// Device handle
    pub fn handle(&self) -> &S {
        &self.handle
    }

    /// Number of signal and wait operations recorded so far
    pub fn crossings(&self) -> u64 {
        self.crossings.load(Ordering::Acquire)
    }

    /// A signal is pending its wait
    pub fn is_signaled(&self) -> bool {
        self.crossings() % 2 == 1
    }

    /// Ready to be signaled again
    pub fn is_waited(&self) -> bool {
        self.crossings() % 2 == 0
    }

    /// Record that an operation signaling this semaphore was issued
    pub fn signal(&self) {
        let previous = self.crossings.fetch_add(1, Ordering::AcqRel);
        debug_assert!(previous % 2 == 0, "signaling a semaphore that is already signaled");
    }

    /// Record that an operation waiting on this semaphore was issued
    pub fn wait(&self) {
        let previous = self.crossings.fetch_add(1, Ordering::AcqRel);
        debug_assert!(previous % 2 == 1, "waiting on a semaphore that was never signaled");
    }

    /// Give the device handle back, e.g. to destroy it
    pub fn into_handle(self) -> S {
        self.handle
    }
}

impl<S: fmt::Debug> fmt::Debug for BinarySemaphore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinarySemaphore")
            .field("handle", &self.handle)
            .field("crossings", &self.crossings())
            .finish()
    }
}

#[cfg(test)]
#[path = "sync_primitive_tests.rs"]
mod tests;
