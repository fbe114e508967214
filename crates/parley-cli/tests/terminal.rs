use parley_cli::terminal::{TYPING, TerminalTranscript, describe, preview};
use parley_core::models::image::ImagePayload;
use parley_core::models::turn::{Role, TurnKind};
use parley_session::transcript::Transcript;

fn output(transcript: TerminalTranscript<Vec<u8>>) -> String {
    String::from_utf8(transcript.into_inner()).unwrap()
}

#[test]
fn appends_one_line_per_entry() {
    let mut transcript = TerminalTranscript::new(Vec::new(), false);
    transcript.append("hello", Role::User, TurnKind::Text);
    transcript.append("hi there", Role::Assistant, TurnKind::Text);

    assert_eq!(output(transcript), "you> hello\nbot> hi there\n");
}

#[test]
fn handles_are_distinct() {
    let mut transcript = TerminalTranscript::new(Vec::new(), false);
    let a = transcript.append("a", Role::User, TurnKind::Text);
    let b = transcript.append("b", Role::User, TurnKind::Text);
    assert_ne!(a, b);
}

#[test]
fn remove_is_noop_when_not_interactive() {
    let mut transcript = TerminalTranscript::new(Vec::new(), false);
    let typing = transcript.append(TYPING, Role::Assistant, TurnKind::Text);
    transcript.remove(typing);

    assert_eq!(output(transcript), "bot> Typing...\n");
}

#[test]
fn remove_erases_last_line_when_interactive() {
    let mut transcript = TerminalTranscript::new(Vec::new(), true);
    let typing = transcript.append(TYPING, Role::Assistant, TurnKind::Text);
    transcript.remove(typing);
    // A second removal of the same handle does nothing.
    transcript.remove(typing);

    assert_eq!(output(transcript), "bot> Typing...\n\x1b[1A\x1b[2K");
}

#[test]
fn remove_ignores_stale_handle() {
    let mut transcript = TerminalTranscript::new(Vec::new(), true);
    let typing = transcript.append(TYPING, Role::Assistant, TurnKind::Text);
    transcript.append("later", Role::User, TurnKind::Text);
    transcript.remove(typing);

    assert_eq!(output(transcript), "bot> Typing...\nyou> later\n");
}

#[test]
fn clear_prints_separator() {
    let mut transcript = TerminalTranscript::new(Vec::new(), false);
    transcript.clear();
    assert_eq!(output(transcript), "--- new conversation ---\n");
}

#[test]
fn images_are_summarized() {
    let payload = ImagePayload::from_bytes(&[0u8; 4096], "image/png").unwrap();
    let text = describe(payload.as_str(), TurnKind::Image);
    assert_eq!(text, "[image image/png, ~4 KB]");

    assert_eq!(describe("garbage", TurnKind::Image), "[image]");
}

#[test]
fn preview_truncates_long_text() {
    assert_eq!(preview("short", TurnKind::Text), "short");

    let long = "x".repeat(300);
    let shortened = preview(&long, TurnKind::Text);
    assert_eq!(shortened.chars().count(), 123);
    assert!(shortened.ends_with("..."));
}
