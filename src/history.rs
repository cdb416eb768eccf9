use parking_lot::RwLock;

use crate::models::HistoryEntry;

pub const HISTORY_LIMIT: usize = 20;

/// Append-only log of past generations, owned outside the generation core.
pub trait HistoryStore: Send + Sync {
    fn persist(&self, entry: HistoryEntry);
    /// Newest first.
    fn load_all(&self) -> Vec<HistoryEntry>;
}

/// Keeps the most recent entries in memory, dropping the oldest beyond `limit`.
pub struct InMemoryHistory {
    entries: RwLock<Vec<HistoryEntry>>,
    limit: usize,
}

impl InMemoryHistory {
    pub fn new(limit: usize) -> Self { Self { entries: RwLock::new(Vec::new()), limit } }
}

impl Default for InMemoryHistory {
    fn default() -> Self { Self::new(HISTORY_LIMIT) }
}

impl HistoryStore for InMemoryHistory {
    fn persist(&self, entry: HistoryEntry) {
        let mut entries = self.entries.write();
        entries.insert(0, entry);
        entries.truncate(self.limit);
    }

    fn load_all(&self) -> Vec<HistoryEntry> { self.entries.read().clone() }
}
