// src/queue.rs
use crate::types::ScanError;
use crate::utils;
use log::debug;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Shared FIFO of wordlist prefixes still waiting to be tried.
///
/// Every pushed candidate is handed out by `try_pop` exactly once, to exactly
/// one caller. Popping never blocks on an empty queue.
#[derive(Debug, Default)]
pub struct WorkQueue {
    items: Mutex<VecDeque<String>>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a wordlist: one prefix per line, whitespace trimmed, blank lines dropped.
    pub fn from_wordlist<P: AsRef<Path>>(path: P) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let lines = utils::read_lines(path).map_err(|source| ScanError::Wordlist {
            path: path.to_path_buf(),
            source,
        })?;

        let queue: Self = lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        debug!("Loaded {} candidates from {}", queue.len(), path.display());
        Ok(queue)
    }

    pub fn push(&self, candidate: String) {
        self.lock().push_back(candidate);
    }

    pub fn try_pop(&self) -> Option<String> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        // A poisoned queue means a worker panicked mid-update; nothing sane can continue.
        self.items.lock().expect("work queue lock poisoned")
    }
}

impl FromIterator<String> for WorkQueue {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            items: Mutex::new(iter.into_iter().collect()),
        }
    }
}
