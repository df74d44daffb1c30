//! End-to-end tests for the review session
//!
//! These exercise the full flow: upload text, browse similar words,
//! merge and remove entries, undo/redo, and persist across sessions.

use std::sync::Arc;
use std::time::Duration;

use wordsift::storage::Storage;
use wordsift::{Session, VocabularySnapshot, Word};

fn new_session(storage: &Arc<Storage>) -> Session {
    Session::with_flush_interval(Arc::clone(storage), Duration::ZERO)
}

fn as_multiset(words: &[Word]) -> Vec<(String, u32)> {
    let mut pairs: Vec<_> = words.iter().map(|w| (w.text.clone(), w.usages)).collect();
    pairs.sort();
    pairs
}

#[test]
fn test_upload_merge_undo_redo() {
    let storage = Arc::new(Storage::in_memory().unwrap());
    let mut session = new_session(&storage);

    session.load_text("собака собака собака собаки собаки кошка");
    assert_eq!(
        as_multiset(session.words()),
        vec![
            ("кошка".into(), 1),
            ("собака".into(), 3),
            ("собаки".into(), 2)
        ]
    );

    // the grouper proposes "собаки" as a merge candidate for "собака"
    let focus = session.words()[0].id;
    session.select(Some(focus)).unwrap();
    let similar = session.similar_to_selected();
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].word.text, "собаки");

    session.merge(focus, similar[0].word.id).unwrap();
    assert_eq!(
        as_multiset(session.words()),
        vec![("кошка".into(), 1), ("собака".into(), 5)]
    );
    assert_eq!(session.selected_word().unwrap().text, "собака");

    session.undo().unwrap();
    assert_eq!(
        as_multiset(session.words()),
        vec![
            ("кошка".into(), 1),
            ("собака".into(), 3),
            ("собаки".into(), 2)
        ]
    );

    session.redo().unwrap();
    assert_eq!(
        as_multiset(session.words()),
        vec![("кошка".into(), 1), ("собака".into(), 5)]
    );
}

#[test]
fn test_edits_persist_across_sessions() {
    let storage = Arc::new(Storage::in_memory().unwrap());

    {
        let mut session = new_session(&storage);
        session.load_text("собака собака кошка мышь");

        let removed = session.words()[2].id;
        session.remove_word(removed).unwrap();

        let common = session.words()[1].id;
        session.mark_common(common).unwrap();
        session.flush();
    }

    let restored = Session::from_storage(Arc::clone(&storage)).unwrap();
    assert_eq!(as_multiset(restored.words()), vec![("собака".into(), 2)]);
    assert_eq!(restored.common(), &["кошка".to_string()]);

    // history is per-session, never persisted
    assert!(!restored.can_undo());
    assert!(!restored.can_redo());
}

#[test]
fn test_fresh_storage_restores_empty_session() {
    let storage = Arc::new(Storage::in_memory().unwrap());
    let session = Session::from_storage(storage).unwrap();

    assert!(session.words().is_empty());
    assert!(session.common().is_empty());
    assert!(session.selected_word().is_none());
    assert!(session.similar_to_selected().is_empty());
}

#[test]
fn test_export_shape_is_json_serializable() {
    let storage = Arc::new(Storage::in_memory().unwrap());
    let mut session = new_session(&storage);
    session.load_text("слово слово дело");

    let json = serde_json::to_string(&session.snapshot()).unwrap();
    let back: VocabularySnapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(back, session.snapshot());
    assert_eq!(back.words[0].text, "слово");
}

#[test]
fn test_sequential_edits_then_full_unwind() {
    let storage = Arc::new(Storage::in_memory().unwrap());
    let mut session = new_session(&storage);

    session.load_text("один один один два два три четыре");
    let initial = as_multiset(session.words());

    let ids: Vec<_> = session.words().iter().map(|w| w.id).collect();
    session.merge(ids[0], ids[1]).unwrap();
    session.remove_word(ids[2]).unwrap();
    session.merge(ids[0], ids[3]).unwrap();

    assert_eq!(as_multiset(session.words()), vec![("один".into(), 6)]);

    while session.can_undo() {
        assert!(session.undo().unwrap());
    }
    assert_eq!(as_multiset(session.words()), initial);

    while session.can_redo() {
        assert!(session.redo().unwrap());
    }
    assert_eq!(as_multiset(session.words()), vec![("один".into(), 6)]);
}

#[test]
fn test_new_edit_after_undo_drops_redo_path() {
    let storage = Arc::new(Storage::in_memory().unwrap());
    let mut session = new_session(&storage);

    session.load_text("собака кошка мышь");
    let ids: Vec<_> = session.words().iter().map(|w| w.id).collect();

    session.remove_word(ids[0]).unwrap();
    session.undo().unwrap();
    assert!(session.can_redo());

    session.remove_word(ids[1]).unwrap();
    assert!(!session.can_redo());
}
