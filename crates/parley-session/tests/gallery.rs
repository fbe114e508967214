mod common;

use common::image_turn;
use parley_core::models::turn::Turn;
use parley_session::gallery::ImageSource;
use parley_session::store::SessionStore;
use parley_storage::memory::MemoryStore;

#[test]
fn lists_archived_images_before_current_ones() {
    let cat = image_turn(b"cat");
    let dog = image_turn(b"dog");
    let fox = image_turn(b"fox");

    let mut store = SessionStore::new(MemoryStore::new());
    store.append_turn(cat.clone());
    let older = store.clear_current().archived_id.unwrap();
    store.append_turn(Turn::user("text only"));
    store.append_turn(dog.clone());
    let newer = store.clear_current().archived_id.unwrap();
    store.append_turn(fox.clone());

    let gallery = store.gallery();
    let images: Vec<_> = gallery.list_images().collect();

    let contents: Vec<&str> = images.iter().map(|i| i.content).collect();
    assert_eq!(contents, vec![dog.content(), cat.content(), fox.content()]);
    assert_eq!(
        images[0].source,
        ImageSource::Archived { conversation_id: newer }
    );
    assert_eq!(
        images[1].source,
        ImageSource::Archived { conversation_id: older }
    );
    assert_eq!(images[2].source, ImageSource::Current);
    assert_eq!(images[1].source_timestamp.as_millisecond(), older);
}

#[test]
fn duplicates_are_listed_once_per_occurrence() {
    let cat = image_turn(b"cat");
    let mut store = SessionStore::new(MemoryStore::new());
    store.append_turn(cat.clone());
    store.append_turn(cat.clone());
    store.clear_current();
    store.append_turn(cat.clone());

    assert_eq!(store.gallery().list_images().count(), 3);
}

#[test]
fn listing_is_restartable() {
    let mut store = SessionStore::new(MemoryStore::new());
    store.append_turn(image_turn(b"a"));
    let gallery = store.gallery();

    let first: Vec<_> = gallery.list_images().map(|i| i.content.to_string()).collect();
    let second: Vec<_> = gallery.list_images().map(|i| i.content.to_string()).collect();
    assert_eq!(first, second);
}

#[test]
fn delete_through_gallery_updates_next_listing() {
    let cat = image_turn(b"cat");
    let dog = image_turn(b"dog");
    let mut store = SessionStore::new(MemoryStore::new());
    store.append_turn(cat.clone());
    store.append_turn(dog.clone());
    store.clear_current();
    store.append_turn(cat.clone());

    let mut gallery = store.gallery_mut();
    let summary = gallery.delete_image(cat.content());
    assert_eq!(summary.removed_turns, 1);

    let remaining: Vec<(String, ImageSource)> = gallery
        .list_images()
        .map(|i| (i.content.to_string(), i.source))
        .collect();
    assert_eq!(remaining.len(), 2);
    assert_eq!(remaining[0].0, dog.content());
    assert_eq!(remaining[1], (cat.content().to_string(), ImageSource::Current));
}

#[test]
fn empty_store_has_no_images() {
    let mut store = SessionStore::new(MemoryStore::new());
    store.append_turn(Turn::user("hi"));
    assert_eq!(store.gallery().list_images().count(), 0);
}

#[test]
fn listing_needs_only_a_shared_borrow() {
    let cat = image_turn(b"cat");
    let mut store = SessionStore::new(MemoryStore::new());
    store.append_turn(cat.clone());
    store.clear_current();

    let store = &store;
    let first = store.gallery();
    let second = store.gallery();
    let images: Vec<_> = first.list_images().collect();

    assert_eq!(images.len(), 1);
    assert_eq!(images[0].content, cat.content());
    assert_eq!(second.list_images().count(), store.archive().len());
}
