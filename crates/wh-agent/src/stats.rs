//! Per-zone counters and the human-readable event log.

use std::collections::VecDeque;

use wh_core::Tick;

/// Monotone per-zone counters.  Reset only by a zone or full reset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneStats {
    /// Order bins removed by pickers.
    pub picks:         u64,
    /// Bins stored by workers.
    pub puts:          u64,
    /// Misplaced bins removed through surveyor repair tickets.
    pub repairs:       u64,
    /// Puts that found their shelf physically full at commit.
    pub put_conflicts: u64,
    /// Failed allocations plus put conflicts.
    pub overflow:      u64,
}

impl ZoneStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ── EventLog ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub tick:    Tick,
    pub message: String,
}

/// Default number of entries kept per zone.
pub const DEFAULT_LOG_CAPACITY: usize = 500;

/// Append-only, newest-last log.  Once full, the oldest entries fall off;
/// `total()` keeps counting.
#[derive(Clone, Debug)]
pub struct EventLog {
    entries:  VecDeque<LogEntry>,
    capacity: usize,
    total:    u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl EventLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: VecDeque::new(), capacity: capacity.max(1), total: 0 }
    }

    pub fn push(&mut self, tick: Tick, message: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry { tick, message: message.into() });
        self.total += 1;
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ever pushed, including evicted ones.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.total = 0;
    }
}
