//! Plain-text transcript for the terminal.

use std::io::{IsTerminal, Write};

use parley_core::models::image::ImagePayload;
use parley_core::models::turn::{Role, TurnKind};
use parley_session::transcript::{EntryHandle, Transcript};

/// Placeholder shown while a reply is pending.
pub const TYPING: &str = "Typing...";

const PREVIEW_CHARS: usize = 120;

/// Writes each entry as one `role> content` line.
///
/// Only the most recent line can be taken back, and only on an interactive
/// terminal; elsewhere removal is a no-op.
pub struct TerminalTranscript<W: Write> {
    out: W,
    interactive: bool,
    next: u64,
    last: Option<EntryHandle>,
}

impl TerminalTranscript<std::io::Stdout> {
    pub fn stdout() -> Self {
        let out = std::io::stdout();
        let interactive = out.is_terminal();
        Self::new(out, interactive)
    }
}

impl<W: Write> TerminalTranscript<W> {
    pub fn new(out: W, interactive: bool) -> Self {
        Self {
            out,
            interactive,
            next: 0,
            last: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Transcript for TerminalTranscript<W> {
    fn append(&mut self, content: &str, role: Role, kind: TurnKind) -> EntryHandle {
        self.next += 1;
        let handle = EntryHandle(self.next);
        let _ = writeln!(self.out, "{}> {}", role_label(role), describe(content, kind));
        let _ = self.out.flush();
        self.last = Some(handle);
        handle
    }

    fn remove(&mut self, handle: EntryHandle) {
        if self.interactive && self.last == Some(handle) {
            // Cursor up one line, erase it.
            let _ = write!(self.out, "\x1b[1A\x1b[2K");
            let _ = self.out.flush();
            self.last = None;
        }
    }

    fn clear(&mut self) {
        let _ = writeln!(self.out, "--- new conversation ---");
        let _ = self.out.flush();
        self.last = None;
    }
}

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "bot",
    }
}

/// One-line rendering of a turn's content. Images are summarized rather
/// than dumped.
pub fn describe(content: &str, kind: TurnKind) -> String {
    match kind {
        TurnKind::Text => content.to_string(),
        TurnKind::Image => match ImagePayload::parse(content) {
            Ok(payload) => {
                let encoded = content.len() - content.find(',').map_or(0, |i| i + 1);
                format!("[image {}, ~{} KB]", payload.mime(), encoded * 3 / 4 / 1024)
            }
            Err(_) => "[image]".to_string(),
        },
    }
}

/// Shortened preview for history listings.
pub fn preview(content: &str, kind: TurnKind) -> String {
    let text = describe(content, kind);
    if text.chars().count() <= PREVIEW_CHARS {
        return text;
    }
    let mut short: String = text.chars().take(PREVIEW_CHARS).collect();
    short.push_str("...");
    short
}
