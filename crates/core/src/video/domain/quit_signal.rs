use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared stop request. Written by a signal handler, read by display sinks
/// between frames.
#[derive(Clone, Debug, Default)]
pub struct QuitSignal(Arc<AtomicBool>);

impl QuitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Blocks for at most `timeout`, then reports whether quit was
    /// requested. Returns immediately if it already was.
    pub fn wait(&self, timeout: Duration) -> bool {
        if self.is_triggered() {
            return true;
        }
        if !timeout.is_zero() {
            std::thread::sleep(timeout);
        }
        self.is_triggered()
    }
}
