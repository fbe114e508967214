use parley_core::models::turn::{Role, TurnKind};

/// Identifies a rendered transcript entry so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle(pub u64);

/// The visible transcript, implemented by whatever front end is attached.
///
/// Rendering is synchronous. The session store only ever calls this while
/// replaying stored turns; transient entries (a pending-reply placeholder,
/// an error notice) are the front end's own business.
pub trait Transcript {
    fn append(&mut self, content: &str, role: Role, kind: TurnKind) -> EntryHandle;

    fn remove(&mut self, handle: EntryHandle);

    fn clear(&mut self);
}

/// Transcript that renders nothing, for headless use.
#[derive(Debug, Default)]
pub struct NullTranscript {
    next: u64,
}

impl Transcript for NullTranscript {
    fn append(&mut self, _content: &str, _role: Role, _kind: TurnKind) -> EntryHandle {
        self.next += 1;
        EntryHandle(self.next)
    }

    fn remove(&mut self, _handle: EntryHandle) {}

    fn clear(&mut self) {}
}
