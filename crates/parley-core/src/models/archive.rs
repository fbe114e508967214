use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::turn::Turn;

/// Number of archived conversations kept before the oldest is evicted.
pub const HISTORY_CAPACITY: usize = 50;

/// An immutable snapshot of a conversation, taken when it was cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedConversation {
    /// Milliseconds since the Unix epoch at archival. Unique within an archive.
    pub id: i64,
    pub timestamp: jiff::Timestamp,
    pub messages: Vec<Turn>,
}

impl ArchivedConversation {
    /// The last turn, used as a preview in history listings.
    pub fn last_turn(&self) -> Option<&Turn> {
        self.messages.last()
    }
}

/// Bounded, most-recent-first list of archived conversations.
///
/// Pushing past capacity evicts from the tail (oldest first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryArchive {
    entries: VecDeque<ArchivedConversation>,
    capacity: usize,
}

impl Default for HistoryArchive {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl HistoryArchive {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild an archive from stored entries (most recent first). Entries
    /// beyond the capacity are dropped from the tail.
    pub fn from_entries(entries: Vec<ArchivedConversation>, capacity: usize) -> Self {
        let mut entries = VecDeque::from(entries);
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    /// Insert at the front. Returns whatever fell off the tail.
    pub fn push_front(&mut self, entry: ArchivedConversation) -> Vec<ArchivedConversation> {
        self.entries.push_front(entry);
        let mut evicted = Vec::new();
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.entries.pop_back() {
                evicted.push(oldest);
            }
        }
        evicted
    }

    /// Next id to hand out: `now_ms`, unless the clock hasn't moved past the
    /// largest id in the archive, in which case one more than that. If that
    /// would overflow, the nearest unused id at or below `now_ms`.
    pub fn next_id(&self, now_ms: i64) -> i64 {
        let Some(largest) = self.entries.iter().map(|c| c.id).max() else {
            return now_ms;
        };
        if largest < now_ms {
            return now_ms;
        }
        largest
            .checked_add(1)
            .unwrap_or_else(|| self.free_id_at_or_below(now_ms))
    }

    fn free_id_at_or_below(&self, start: i64) -> i64 {
        (i64::MIN..=start)
            .rev()
            .find(|id| self.get(*id).is_none())
            .unwrap_or(i64::MIN)
    }

    pub fn get(&self, id: i64) -> Option<&ArchivedConversation> {
        self.entries.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArchivedConversation> {
        self.entries.iter()
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
    }

    /// Apply `f` to each conversation's messages, then drop conversations
    /// left with no messages. Returns how many were dropped.
    pub fn retain_messages<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&Turn) -> bool,
    {
        for conversation in self.entries.iter_mut() {
            conversation.messages.retain(|turn| f(turn));
        }
        let before = self.entries.len();
        self.entries.retain(|c| !c.messages.is_empty());
        before - self.entries.len()
    }

    /// Entries as a contiguous slice-friendly vector, for serialization.
    pub fn to_vec(&self) -> Vec<ArchivedConversation> {
        self.entries.iter().cloned().collect()
    }
}
