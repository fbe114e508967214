use parley_core::models::archive::HistoryArchive;
use parley_core::models::turn::Turn;
use parley_storage::kv::KeyValueStore;

use crate::store::{DeleteSummary, SessionStore};

/// Where a gallery image was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Archived { conversation_id: i64 },
    Current,
}

/// One image turn, borrowed from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryImage<'a> {
    pub content: &'a str,
    pub source: ImageSource,
    /// Archival time for archived images; listing time for current ones.
    pub source_timestamp: jiff::Timestamp,
}

/// Read view over every image turn in the archive and current conversation.
/// Holds no state of its own.
pub struct GalleryIndex<'a, S> {
    store: &'a SessionStore<S>,
}

impl<'a, S: KeyValueStore> GalleryIndex<'a, S> {
    pub(crate) fn new(store: &'a SessionStore<S>) -> Self {
        Self { store }
    }

    /// Archived images first (archive order), then the current
    /// conversation's. Duplicates are kept. Recomputed on every call.
    pub fn list_images(&self) -> impl Iterator<Item = GalleryImage<'a>> + use<'a, S> {
        images(self.store.current(), self.store.archive())
    }
}

/// [`GalleryIndex`] that can also delete.
pub struct GalleryIndexMut<'a, S> {
    store: &'a mut SessionStore<S>,
}

impl<'a, S: KeyValueStore> GalleryIndexMut<'a, S> {
    pub(crate) fn new(store: &'a mut SessionStore<S>) -> Self {
        Self { store }
    }

    pub fn list_images(&self) -> impl Iterator<Item = GalleryImage<'_>> + '_ {
        images(self.store.current(), self.store.archive())
    }

    /// Delete from the archive. Re-list afterwards to see the result.
    pub fn delete_image(&mut self, content: &str) -> DeleteSummary {
        self.store.delete_image(content)
    }
}

fn images<'a>(
    current: &'a [Turn],
    archive: &'a HistoryArchive,
) -> impl Iterator<Item = GalleryImage<'a>> + 'a {
    let now = jiff::Timestamp::now();

    let archived = archive.iter().flat_map(|conversation| {
        conversation
            .messages
            .iter()
            .filter(|turn| turn.is_image())
            .map(move |turn| GalleryImage {
                content: turn.content(),
                source: ImageSource::Archived {
                    conversation_id: conversation.id,
                },
                source_timestamp: conversation.timestamp,
            })
    });

    let current = current
        .iter()
        .filter(|turn| turn.is_image())
        .map(move |turn| GalleryImage {
            content: turn.content(),
            source: ImageSource::Current,
            source_timestamp: now,
        });

    archived.chain(current)
}
