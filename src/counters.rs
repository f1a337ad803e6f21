// src/counters.rs
use std::sync::atomic::{AtomicUsize, Ordering};

/// Attempted / found tallies shared by every worker of one scan.
#[derive(Debug, Default)]
pub struct Counters {
    tried: AtomicUsize,
    found: AtomicUsize,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished lookup. `tried` is bumped before `found` so that
    /// `found <= tried` holds for any reader that loads `found` first.
    pub fn record(&self, success: bool) {
        self.tried.fetch_add(1, Ordering::SeqCst);
        if success {
            self.found.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Returns `(found, tried)`.
    pub fn snapshot(&self) -> (usize, usize) {
        let found = self.found.load(Ordering::SeqCst);
        let tried = self.tried.load(Ordering::SeqCst);
        (found, tried)
    }

    pub fn tried(&self) -> usize {
        self.tried.load(Ordering::SeqCst)
    }

    pub fn found(&self) -> usize {
        self.found.load(Ordering::SeqCst)
    }
}
