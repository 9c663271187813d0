//! The global stateless request counter.
//!
//! One process-wide integer, deliberately not keyed by client, session, or
//! IP - the whole point is that the service retains no per-client memory.
//! Any caller incrementing it sees the next value in a single shared
//! sequence. Resets to zero only when the process restarts.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing process-wide counter.
#[derive(Debug, Default)]
pub struct RequestCounter {
    count: AtomicU64,
}

impl RequestCounter {
    /// Create a counter starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
        }
    }

    /// Atomically increment the counter and return the new value.
    pub fn increment_and_get(&self) -> u64 {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Read the current value without mutating.
    #[must_use]
    pub fn get(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }
}
