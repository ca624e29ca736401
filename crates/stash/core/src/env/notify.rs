use std::sync::atomic::{AtomicUsize, Ordering};

/// Receives the "container changed" signal after a successful mutation.
pub trait ChangeSink: Send + Sync {
    fn changed(&self);
}

impl<F> ChangeSink for F
where
    F: Fn() + Send + Sync,
{
    fn changed(&self) {
        self()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl ChangeSink for NoopSink {
    fn changed(&self) {}
}

/// Counts notifications; mostly useful in tests and headless drivers.
#[derive(Debug, Default)]
pub struct ChangeCounter {
    count: AtomicUsize,
}

impl ChangeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// Returns the current count and resets it to zero.
    pub fn take(&self) -> usize {
        self.count.swap(0, Ordering::Relaxed)
    }
}

impl ChangeSink for ChangeCounter {
    fn changed(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}
