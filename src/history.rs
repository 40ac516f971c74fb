//! Bounded snapshot log that lets a driver step back through a search.
//!
//! Rewinding only replays recorded snapshots. The solver keeps its own
//! (newer) internal state, so advancing again after a rewind continues from
//! where the solver actually is.

use crate::snapshot::Snapshot;
use log::debug;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
pub struct StepHistory {
    entries: VecDeque<Snapshot>,
    capacity: usize,
    cursor: usize,
}

impl StepHistory {
    /// A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        StepHistory {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
            cursor: 0,
        }
    }

    /// Appends a snapshot, evicting the oldest one when full.
    pub fn record(&mut self, snapshot: Snapshot) {
        let was_empty = self.entries.is_empty();
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.cursor = self.cursor.saturating_sub(1);
            debug!("history full at {} entries, evicted oldest", self.capacity);
        }
        self.entries.push_back(snapshot);

        self.cursor = if was_empty {
            0
        } else {
            (self.cursor + 1).min(self.entries.len() - 1)
        };
    }

    /// Moves the cursor back one entry. Returns `None` at position 0.
    pub fn rewind(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Moves the cursor forward one entry. Returns `None` at the newest entry.
    pub fn forward(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor)
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True while the cursor sits behind the newest entry.
    pub fn is_rewound(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }
}

impl Default for StepHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
