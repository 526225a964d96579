//! Session persistence across store restarts.

use beatsmith::providers::Citation;
use beatsmith::session::{ChatSession, Message, MessageRole, SessionStore};

#[test]
fn test_sessions_survive_store_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("sessions.db");

    let session_id = {
        let store = SessionStore::new(&db_path).unwrap();
        let mut session = ChatSession::new("dark trap with heavy 808s");
        session.push(Message::new(MessageRole::User, "dark trap with heavy 808s"));
        session.push(Message::assistant_with_citations(
            "What up doe? Say less.",
            vec![Citation {
                uri: "https://example.com".to_string(),
                title: "Example".to_string(),
            }],
        ));
        store.save(&session).unwrap();
        session.id
    };

    // Reopen from the same path in a fresh handle
    let store = SessionStore::new(&db_path).unwrap();
    let loaded = store.get(&session_id).unwrap().unwrap();
    assert_eq!(loaded.messages.len(), 2);
    assert_eq!(loaded.messages[1].content, "What up doe? Say less.");
    assert_eq!(loaded.messages[1].citations.len(), 1);

    let sessions = store.list().unwrap();
    assert_eq!(sessions.len(), 1);
}

#[test]
fn test_branching_creates_independent_persisted_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("sessions.db")).unwrap();

    let mut original = ChatSession::new("first idea");
    original.push(Message::new(MessageRole::User, "first idea"));
    original.push(Message::new(MessageRole::Assistant, "take one"));
    original.push(Message::new(MessageRole::User, "second idea"));
    original.push(Message::new(MessageRole::Assistant, "take two"));
    store.save(&original).unwrap();

    let branch_point = original.messages[1].id.clone();
    let branch = original.branch_at(&branch_point).unwrap();
    store.save(&branch).unwrap();

    // Both live side by side; the branch stops at the branch point
    let branched = store.get(&branch.id).unwrap().unwrap();
    assert_eq!(branched.messages.len(), 2);
    assert_eq!(branched.title, "Branch: take one...");
    let kept = store.get(&original.id).unwrap().unwrap();
    assert_eq!(kept.messages.len(), 4);
}

#[test]
fn test_delete_only_removes_target() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("sessions.db")).unwrap();

    let keep = ChatSession::new("keep me");
    let drop = ChatSession::new("drop me");
    store.save(&keep).unwrap();
    store.save(&drop).unwrap();

    assert!(store.delete(&drop.id).unwrap());
    assert!(store.get(&keep.id).unwrap().is_some());
    assert_eq!(store.list().unwrap().len(), 1);
}
