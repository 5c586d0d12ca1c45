//! Append-only in-memory history logs.
//!
//! Both the per-stage result logs and the orchestrator's run history are a
//! [`HistoryLog`]. A log is unbounded unless created with a capacity, in
//! which case the oldest entry is evicted once the capacity is reached.

use parking_lot::RwLock;
use std::collections::VecDeque;

#[derive(Debug)]
struct LogState<T> {
    entries: VecDeque<T>,
    evicted: usize,
}

/// Thread-safe, insertion-ordered, append-only log.
#[derive(Debug)]
pub struct HistoryLog<T> {
    state: RwLock<LogState<T>>,
    capacity: Option<usize>,
}

impl<T> Default for HistoryLog<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> HistoryLog<T> {
    /// Creates a log that keeps every entry.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::with_capacity(None)
    }

    /// Creates a log with an optional capacity.
    ///
    /// A capacity of zero is treated as unbounded.
    #[must_use]
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            state: RwLock::new(LogState {
                entries: VecDeque::new(),
                evicted: 0,
            }),
            capacity: capacity.filter(|c| *c > 0),
        }
    }

    /// Appends an entry, evicting the oldest one if the log is full.
    pub fn push(&self, entry: T) {
        let mut state = self.state.write();
        if let Some(capacity) = self.capacity {
            while state.entries.len() >= capacity {
                state.entries.pop_front();
                state.evicted += 1;
            }
        }
        state.entries.push_back(entry);
    }

    /// Returns the number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Returns true if nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Returns the configured capacity.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Returns how many entries have been evicted so far.
    #[must_use]
    pub fn evicted(&self) -> usize {
        self.state.read().evicted
    }

    /// Returns the total number of entries ever appended.
    #[must_use]
    pub fn total_appended(&self) -> usize {
        let state = self.state.read();
        state.entries.len() + state.evicted
    }

    /// Runs `f` over the retained entries, oldest first, without cloning.
    pub fn read<R>(&self, f: impl FnOnce(&VecDeque<T>) -> R) -> R {
        f(&self.state.read().entries)
    }
}

impl<T: Clone> HistoryLog<T> {
    /// Returns a copy of the retained entries, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.state.read().entries.iter().cloned().collect()
    }

    /// Returns the most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.state.read().entries.back().cloned()
    }
}
