//! Counter of in-flight work items.

use parking_lot::{Condvar, Mutex};

/// Counts work that has been handed to a worker but not yet finished.
///
/// Producers call [`enter`](Self::enter) before queueing, the worker calls
/// [`leave`](Self::leave) once the item ran, and [`wait`](Self::wait) blocks
/// until the count drops to zero.
#[derive(Debug, Default)]
pub struct PendingWork {
    count: Mutex<usize>,
    drained: Condvar,
}

impl PendingWork {
    /// Creates a counter with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one more pending item.
    pub fn enter(&self) {
        *self.count.lock() += 1;
    }

    /// Marks one pending item as finished.
    pub fn leave(&self) {
        let mut count = self.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.drained.notify_all();
        }
    }

    /// Blocks until every registered item has finished.
    pub fn wait(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.drained.wait(&mut count);
        }
    }

    /// Number of items currently pending.
    #[must_use]
    pub fn pending(&self) -> usize {
        *self.count.lock()
    }
}
