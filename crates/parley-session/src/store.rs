//! Session persistence.
//!
//! The store owns the in-progress conversation and the history archive and
//! writes each of them through to the key-value store on every mutation.
//! Storage failures are logged and reported as [`FlushOutcome::Failed`]; the
//! in-memory change stands either way.

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use parley_core::models::archive::{ArchivedConversation, HISTORY_CAPACITY, HistoryArchive};
use parley_core::models::turn::Turn;
use parley_core::storage_keys;
use parley_storage::kv::KeyValueStore;
use parley_storage::state::{load_state, save_list_or_remove};

use crate::error::SessionError;
use crate::gallery::{GalleryIndex, GalleryIndexMut};
use crate::transcript::Transcript;

/// What happened to the persisted copy after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    Written,
    /// The value was empty, so its key was removed instead.
    Removed,
    /// The write failed; only the in-memory state changed.
    Failed,
}

impl FlushOutcome {
    pub fn is_durable(self) -> bool {
        !matches!(self, FlushOutcome::Failed)
    }
}

/// Result of [`SessionStore::clear_current`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearSummary {
    /// Id of the new archive entry, if the conversation was non-empty.
    pub archived_id: Option<i64>,
    /// Archive entries evicted to stay within capacity.
    pub evicted: usize,
    /// `None` when nothing was archived and the archive was left alone.
    pub archive_flush: Option<FlushOutcome>,
    pub current_flush: FlushOutcome,
}

/// Result of [`SessionStore::delete_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteSummary {
    pub removed_turns: usize,
    pub dropped_conversations: usize,
    pub flush: FlushOutcome,
}

pub struct SessionStore<S> {
    storage: S,
    current: Vec<Turn>,
    archive: HistoryArchive,
    epoch: u64,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// An empty store over `storage`. Nothing is read.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            current: Vec::new(),
            archive: HistoryArchive::default(),
            epoch: 0,
        }
    }

    /// Restore the current conversation and the archive from `storage` and
    /// replay the restored turns into `transcript`.
    ///
    /// Each key is read independently. A missing key, a failed read, or
    /// unparseable JSON leaves that part empty; nothing is propagated.
    pub fn load(storage: S, transcript: &mut dyn Transcript) -> Self {
        let current: Vec<Turn> = read_list(&storage, storage_keys::CURRENT_CONVERSATION);
        let entries: Vec<ArchivedConversation> =
            read_list(&storage, storage_keys::CONVERSATIONS_HISTORY);

        if entries.len() > HISTORY_CAPACITY {
            warn!(
                count = entries.len(),
                capacity = HISTORY_CAPACITY,
                "stored archive exceeds capacity, keeping most recent entries"
            );
        }

        let store = Self {
            storage,
            current,
            archive: HistoryArchive::from_entries(entries, HISTORY_CAPACITY),
            epoch: 0,
        };

        info!(
            turns = store.current.len(),
            archived = store.archive.len(),
            "session loaded"
        );

        store.replay(transcript);
        store
    }

    /// Clear the transcript and render every turn of the current conversation.
    pub fn replay(&self, transcript: &mut dyn Transcript) {
        transcript.clear();
        for turn in &self.current {
            transcript.append(turn.content(), turn.role(), turn.kind());
        }
    }

    /// Append a turn and persist the whole current conversation.
    pub fn append_turn(&mut self, turn: Turn) -> FlushOutcome {
        self.current.push(turn);
        self.flush_current()
    }

    /// Archive the current conversation (if non-empty) and start a new one.
    ///
    /// Always advances the epoch, so replies still in flight for the old
    /// conversation are discarded when they arrive.
    pub fn clear_current(&mut self) -> ClearSummary {
        let mut summary = ClearSummary {
            archived_id: None,
            evicted: 0,
            archive_flush: None,
            current_flush: FlushOutcome::Removed,
        };

        if !self.current.is_empty() {
            let timestamp = jiff::Timestamp::now();
            let id = self.archive.next_id(timestamp.as_millisecond());
            let evicted = self.archive.push_front(ArchivedConversation {
                id,
                timestamp,
                messages: self.current.clone(),
            });

            debug!(id, turns = self.current.len(), evicted = evicted.len(), "conversation archived");

            summary.archived_id = Some(id);
            summary.evicted = evicted.len();
            summary.archive_flush = Some(self.flush_archive());
        }

        self.current.clear();
        self.bump_epoch();
        summary.current_flush = self.flush_current();
        summary
    }

    /// Make a copy of an archived conversation the current one. The archive
    /// entry itself is left untouched.
    pub fn load_archived_conversation(&mut self, id: i64) -> Result<FlushOutcome, SessionError> {
        let messages = self
            .archive
            .get(id)
            .map(|c| c.messages.clone())
            .ok_or(SessionError::ArchiveNotFound(id))?;

        self.current = messages;
        self.bump_epoch();
        debug!(id, turns = self.current.len(), "archived conversation loaded");
        Ok(self.flush_current())
    }

    /// Empty the archive and remove its key. No confirmation.
    pub fn clear_archive(&mut self) -> FlushOutcome {
        let count = self.archive.len();
        self.archive.clear();
        info!(count, "archive cleared");
        self.flush_archive()
    }

    /// Like [`clear_archive`](Self::clear_archive), but only once `confirm`
    /// returns `true`. Returns `None` if the user declined.
    pub fn clear_archive_confirmed<F>(&mut self, confirm: F) -> Option<FlushOutcome>
    where
        F: FnOnce() -> bool,
    {
        if !confirm() {
            debug!("archive clear declined");
            return None;
        }
        Some(self.clear_archive())
    }

    /// Remove every archived image turn whose content equals `content`, then
    /// drop archived conversations left empty. The current conversation is
    /// not touched.
    pub fn delete_image(&mut self, content: &str) -> DeleteSummary {
        let mut removed_turns = 0;
        let dropped_conversations = self.archive.retain_messages(|turn| {
            let matches = turn.is_image() && turn.content() == content;
            if matches {
                removed_turns += 1;
            }
            !matches
        });

        info!(removed_turns, dropped_conversations, "image deleted from archive");

        DeleteSummary {
            removed_turns,
            dropped_conversations,
            flush: self.flush_archive(),
        }
    }

    /// Derived view over every image turn.
    pub fn gallery(&self) -> GalleryIndex<'_, S> {
        GalleryIndex::new(self)
    }

    /// Like [`gallery`](Self::gallery), with deletion.
    pub fn gallery_mut(&mut self) -> GalleryIndexMut<'_, S> {
        GalleryIndexMut::new(self)
    }

    pub fn current(&self) -> &[Turn] {
        &self.current
    }

    pub fn archive(&self) -> &HistoryArchive {
        &self.archive
    }

    /// Identifies the current conversation instance. Advanced whenever the
    /// current conversation is cleared or replaced.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn bump_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub(crate) fn flush_current(&mut self) -> FlushOutcome {
        flush_list(
            &mut self.storage,
            storage_keys::CURRENT_CONVERSATION,
            &self.current,
        )
    }

    fn flush_archive(&mut self) -> FlushOutcome {
        let entries = self.archive.to_vec();
        flush_list(&mut self.storage, storage_keys::CONVERSATIONS_HISTORY, &entries)
    }
}

fn read_list<S, T>(storage: &S, key: &str) -> Vec<T>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    match load_state::<Vec<T>>(storage, key) {
        Ok(Some(items)) => items,
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "could not load stored value, starting empty");
            Vec::new()
        }
    }
}

fn flush_list<S, T>(storage: &mut S, key: &str, items: &[T]) -> FlushOutcome
where
    S: KeyValueStore,
    T: serde::Serialize,
{
    match save_list_or_remove(storage, key, items) {
        Ok(true) => FlushOutcome::Written,
        Ok(false) => FlushOutcome::Removed,
        Err(e) => {
            warn!(key, error = %e, "could not persist value");
            FlushOutcome::Failed
        }
    }
}
