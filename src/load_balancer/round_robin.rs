//! Round-robin rotation cursor.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Round-robin selector.
///
/// Holds the index of the backend that serves the next request. Reading the
/// index and advancing it is one atomic step, so concurrent callers never
/// observe the same position and the cursor stays in `[0, len)`.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current index and advance to `(current + 1) % len`.
    ///
    /// `len` must be non-zero and stable for the lifetime of the selector.
    pub fn next_index(&self, len: usize) -> usize {
        debug_assert!(len > 0, "round robin over an empty pool");
        match self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some((current + 1) % len)
            }) {
            Ok(previous) | Err(previous) => previous,
        }
    }

    /// Index the next call will return.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }
}
