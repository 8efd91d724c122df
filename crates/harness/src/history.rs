//! Bounded, most-recent-first result history.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::result::BenchmarkResult;

pub const HISTORY_CAPACITY: usize = 300;

pub struct History {
    entries: Mutex<VecDeque<BenchmarkResult>>,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Mutex::new(VecDeque::new()), capacity }
    }

    /// Insert at the front; the oldest entry falls off once capacity is
    /// exceeded.
    pub fn push(&self, result: BenchmarkResult) {
        let mut entries = self.entries.lock();
        entries.push_front(result);
        while entries.len() > self.capacity {
            entries.pop_back();
        }
    }

    /// Newest-first copy of the entries.
    pub fn snapshot(&self) -> Vec<BenchmarkResult> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
