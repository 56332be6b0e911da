//! Room identity as seen through send and pull.

use super::harness::ledger_at;
use crate::pagination::PagePolicy;
use crate::{resolve_room, LedgerError};

#[test]
fn room_key_ignores_order_and_case() {
    let a = resolve_room("Alice:BOB").unwrap();
    let b = resolve_room("bob:alice").unwrap();
    let c = resolve_room("alice:bob").unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[tokio::test]
async fn every_spelling_reads_the_same_room() {
    let (ledger, store, _clock) = ledger_at(100, PagePolicy::Legacy);
    ledger.send("alice:bob", "alice", "one").await.unwrap();
    ledger.send("Bob:Alice", "Bob", "two").await.unwrap();

    assert_eq!(store.collections(), vec!["alice:bob".to_string()]);

    for chat in ["alice:bob", "bob:alice", "ALICE:bob"] {
        let page = ledger.pull(chat, 0, 10, false).await.unwrap();
        assert_eq!(page.messages.len(), 2, "{chat}");
        assert!(page.messages.iter().all(|m| m.chat == chat));
    }
}

#[tokio::test]
async fn distinct_pairs_are_distinct_rooms() {
    let (ledger, store, _clock) = ledger_at(100, PagePolicy::Legacy);
    ledger.send("alice:bob", "alice", "to bob").await.unwrap();
    ledger.send("alice:carol", "alice", "to carol").await.unwrap();

    assert_eq!(store.len("alice:bob"), 1);
    assert_eq!(store.len("alice:carol"), 1);

    let page = ledger.pull("carol:alice", 0, 10, false).await.unwrap();
    assert_eq!(page.messages.len(), 1);
    assert_eq!(page.messages[0].text, "to carol");
}

#[tokio::test]
async fn malformed_descriptors_are_rejected_on_both_paths() {
    let (ledger, store, _clock) = ledger_at(100, PagePolicy::Legacy);

    for chat in ["alice", "a:b:c", ":bob", ""] {
        assert!(matches!(
            ledger.send(chat, "alice", "hi").await,
            Err(LedgerError::InvalidChatFormat(_))
        ));
        assert!(matches!(
            ledger.pull(chat, 0, 10, false).await,
            Err(LedgerError::InvalidChatFormat(_))
        ));
    }
    assert!(store.collections().is_empty());
}

#[tokio::test]
async fn self_chat_is_a_room() {
    let (ledger, store, _clock) = ledger_at(100, PagePolicy::Legacy);
    ledger.send("ann:Ann", "Ann", "note to self").await.unwrap();

    assert_eq!(store.len("ann:ann"), 1);
    let page = ledger.pull("ann:ann", 0, 5, false).await.unwrap();
    assert_eq!(page.messages[0].sender, "Ann");
}
