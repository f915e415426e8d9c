//! Bounded, newest-first list of session summaries.

use uuid::Uuid;

use wikibot_core::SessionSummary;
use wikibot_core::limits::DEFAULT_LEDGER_CAPACITY;

#[derive(Debug, Clone)]
pub struct RecentSessionsLedger {
    entries: Vec<SessionSummary>,
    capacity: usize,
}

impl RecentSessionsLedger {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_capacity(DEFAULT_LEDGER_CAPACITY)
    }

    /// A capacity of zero is treated as one.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: if capacity == 0 { 1 } else { capacity },
        }
    }

    /// Prepend `summary`, evicting the oldest entries beyond capacity.
    pub fn insert_front(&mut self, summary: SessionSummary) {
        self.entries.insert(0, summary);
        self.entries.truncate(self.capacity);
    }

    /// Newest-first snapshot.
    #[must_use]
    pub fn list(&self) -> Vec<SessionSummary> {
        self.entries.clone()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SessionSummary> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn find(&self, id: Uuid) -> Option<&SessionSummary> {
        self.entries.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RecentSessionsLedger {
    fn default() -> Self {
        Self::new()
    }
}
