#![allow(dead_code)]

use parley_core::models::image::ImagePayload;
use parley_core::models::turn::{Role, Turn, TurnKind};
use parley_session::transcript::{EntryHandle, Transcript};

/// Transcript that records what would have been shown.
#[derive(Debug, Default)]
pub struct RecordingTranscript {
    pub entries: Vec<(EntryHandle, String, Role, TurnKind)>,
    pub clears: usize,
    next: u64,
}

impl RecordingTranscript {
    pub fn contents(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, c, _, _)| c.as_str()).collect()
    }
}

impl Transcript for RecordingTranscript {
    fn append(&mut self, content: &str, role: Role, kind: TurnKind) -> EntryHandle {
        self.next += 1;
        let handle = EntryHandle(self.next);
        self.entries.push((handle, content.to_string(), role, kind));
        handle
    }

    fn remove(&mut self, handle: EntryHandle) {
        self.entries.retain(|(h, _, _, _)| *h != handle);
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.clears += 1;
    }
}

/// A tiny image turn whose content is distinguishable by `seed`.
pub fn image_turn(seed: &[u8]) -> Turn {
    let payload = ImagePayload::from_bytes(seed, "image/png").expect("small image should encode");
    Turn::image(Role::User, payload)
}
