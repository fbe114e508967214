use parley_core::models::turn::Turn;
use parley_session::error::SessionError;
use parley_session::exchange::ExchangeOutcome;
use parley_session::store::SessionStore;
use parley_storage::memory::MemoryStore;

#[test]
fn reply_is_appended_to_issuing_conversation() {
    let mut store = SessionStore::new(MemoryStore::new());
    let pending = store.begin_exchange("  hi  ").unwrap();

    assert_eq!(pending.request().messages, vec![Turn::user("hi")]);
    assert_eq!(store.current(), &[Turn::user("hi")]);

    let outcome = store.finish_exchange(pending, Ok::<_, String>("hello".to_string()));
    assert!(matches!(outcome, ExchangeOutcome::Replied(ref t) if *t == Turn::assistant("hello")));
    assert_eq!(store.current(), &[Turn::user("hi"), Turn::assistant("hello")]);
}

#[test]
fn request_carries_whole_conversation() {
    let mut store = SessionStore::new(MemoryStore::new());
    store.append_turn(Turn::user("one"));
    store.append_turn(Turn::assistant("two"));

    let pending = store.begin_exchange("three").unwrap();
    let json = serde_json::to_value(pending.request()).unwrap();
    assert_eq!(json["messages"].as_array().unwrap().len(), 3);
    assert_eq!(json["messages"][2]["content"], "three");
}

#[test]
fn blank_message_is_rejected() {
    let mut store = SessionStore::new(MemoryStore::new());
    assert!(matches!(
        store.begin_exchange("   \n"),
        Err(SessionError::EmptyMessage)
    ));
    assert!(store.current().is_empty());
}

#[test]
fn failed_reply_appends_nothing() {
    let mut store = SessionStore::new(MemoryStore::new());
    let pending = store.begin_exchange("hi").unwrap();

    let outcome = store.finish_exchange(pending, Err::<String, _>("HTTP 502".to_string()));
    assert!(matches!(outcome, ExchangeOutcome::Failed(ref e) if e == "HTTP 502"));
    assert_eq!(store.current(), &[Turn::user("hi")]);
}

#[test]
fn reply_after_clear_is_discarded() {
    let mut store = SessionStore::new(MemoryStore::new());
    let pending = store.begin_exchange("hi").unwrap();
    store.clear_current();

    let outcome = store.finish_exchange(pending, Ok::<_, String>("late".to_string()));
    assert!(matches!(outcome, ExchangeOutcome::Discarded));
    assert!(store.current().is_empty());
    assert_eq!(
        store.archive().iter().next().unwrap().messages,
        vec![Turn::user("hi")]
    );
}

#[test]
fn reply_after_loading_archive_is_discarded() {
    let mut store = SessionStore::new(MemoryStore::new());
    store.append_turn(Turn::user("old"));
    let id = store.clear_current().archived_id.unwrap();

    let pending = store.begin_exchange("new").unwrap();
    store.load_archived_conversation(id).unwrap();

    let outcome = store.finish_exchange(pending, Ok::<_, String>("late".to_string()));
    assert!(matches!(outcome, ExchangeOutcome::Discarded));
    assert_eq!(store.current(), &[Turn::user("old")]);
}

#[test]
fn appending_does_not_invalidate_pending_reply() {
    let mut store = SessionStore::new(MemoryStore::new());
    let pending = store.begin_exchange("hi").unwrap();
    store.append_turn(Turn::user("and another thing"));

    let outcome = store.finish_exchange(pending, Ok::<_, String>("hello".to_string()));
    assert!(matches!(outcome, ExchangeOutcome::Replied(_)));
    assert_eq!(store.current().len(), 3);
}
