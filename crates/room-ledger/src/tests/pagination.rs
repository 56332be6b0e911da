//! Cursors, limits and chained pulls.

use super::harness::{drain, ledger_at, seed};
use crate::pagination::PagePolicy;
use crate::LedgerError;

fn texts(range: impl IntoIterator<Item = usize>) -> Vec<String> {
    range.into_iter().map(|i| format!("m{i}")).collect()
}

#[tokio::test]
async fn legacy_full_page_holds_limit_minus_one() {
    let (ledger, _store, clock) = ledger_at(1000, PagePolicy::Legacy);
    seed(&ledger, &clock, 10).await;

    let page = ledger.pull("alice:bob", 0, 3, false).await.unwrap();
    let got: Vec<_> = page.messages.into_iter().map(|m| m.text).collect();
    assert_eq!(got, texts([0, 1]));
    assert!(page.has_more);
    assert_eq!(page.next_cursor, 3);
}

#[tokio::test]
async fn legacy_chaining_skips_one_rank_per_full_page() {
    let (ledger, _store, clock) = ledger_at(1000, PagePolicy::Legacy);
    seed(&ledger, &clock, 10).await;

    let seen = drain(&ledger, "alice:bob", 3, false).await;
    assert_eq!(seen, texts([0, 1, 3, 4, 6, 7, 9]));
}

#[tokio::test]
async fn legacy_pages_never_exceed_limit_minus_one() {
    let (ledger, _store, clock) = ledger_at(1000, PagePolicy::Legacy);
    seed(&ledger, &clock, 25).await;

    for limit in [2, 4, 7] {
        let mut cursor = 0;
        loop {
            let page = ledger.pull("alice:bob", cursor, limit, false).await.unwrap();
            if page.has_more {
                assert!(page.messages.len() <= (limit - 1) as usize);
                cursor = page.next_cursor;
            } else {
                break;
            }
        }
    }
}

#[tokio::test]
async fn legacy_exactly_limit_remaining_reports_more_then_empty() {
    let (ledger, _store, clock) = ledger_at(1000, PagePolicy::Legacy);
    seed(&ledger, &clock, 3).await;

    let first = ledger.pull("alice:bob", 0, 3, false).await.unwrap();
    assert_eq!(first.messages.len(), 2);
    assert!(first.has_more);
    assert_eq!(first.next_cursor, 3);

    let second = ledger.pull("alice:bob", 3, 3, false).await.unwrap();
    assert!(second.messages.is_empty());
    assert!(!second.has_more);
    assert_eq!(second.next_cursor, 0);
}

#[tokio::test]
async fn legacy_short_room_fits_one_page() {
    let (ledger, _store, clock) = ledger_at(1000, PagePolicy::Legacy);
    seed(&ledger, &clock, 2).await;

    let page = ledger.pull("alice:bob", 0, 3, false).await.unwrap();
    assert_eq!(page.messages.len(), 2);
    assert!(!page.has_more);
    assert_eq!(page.next_cursor, 0);
}

#[tokio::test]
async fn exact_chaining_enumerates_every_message_once() {
    for count in [0, 1, 9, 10, 11] {
        let (ledger, _store, clock) = ledger_at(1000, PagePolicy::Exact);
        seed(&ledger, &clock, count).await;

        assert_eq!(drain(&ledger, "alice:bob", 3, false).await, texts(0..count));

        let mut expected = texts(0..count);
        expected.reverse();
        assert_eq!(drain(&ledger, "bob:alice", 4, true).await, expected);
    }
}

#[tokio::test]
async fn exact_full_page_holds_limit() {
    let (ledger, _store, clock) = ledger_at(1000, PagePolicy::Exact);
    seed(&ledger, &clock, 10).await;

    let page = ledger.pull("alice:bob", 3, 3, false).await.unwrap();
    let got: Vec<_> = page.messages.into_iter().map(|m| m.text).collect();
    assert_eq!(got, texts([3, 4, 5]));
    assert!(page.has_more);
    assert_eq!(page.next_cursor, 6);
}

#[tokio::test]
async fn empty_room_is_empty_at_any_cursor() {
    for policy in [PagePolicy::Legacy, PagePolicy::Exact] {
        let (ledger, _store, _clock) = ledger_at(1000, policy);
        for cursor in [0, 1, 50] {
            let page = ledger.pull("nobody:else", cursor, 10, false).await.unwrap();
            assert!(page.messages.is_empty());
            assert!(!page.has_more);
            assert_eq!(page.next_cursor, 0);
        }
    }
}

#[tokio::test]
async fn cursor_past_end_is_empty() {
    let (ledger, _store, clock) = ledger_at(1000, PagePolicy::Legacy);
    seed(&ledger, &clock, 4).await;

    let page = ledger.pull("alice:bob", 4, 10, true).await.unwrap();
    assert!(page.messages.is_empty());
    assert!(!page.has_more);
}

#[tokio::test]
async fn zero_limit_emits_nothing() {
    let (ledger, _store, clock) = ledger_at(1000, PagePolicy::Legacy);
    seed(&ledger, &clock, 4).await;

    let page = ledger.pull("alice:bob", 1, 0, false).await.unwrap();
    assert!(page.messages.is_empty());
    assert!(page.has_more);
    assert_eq!(page.next_cursor, 1);
}

#[tokio::test]
async fn negative_cursor_or_limit_is_rejected() {
    let (ledger, _store, clock) = ledger_at(1000, PagePolicy::Legacy);
    seed(&ledger, &clock, 2).await;

    assert!(matches!(
        ledger.pull("alice:bob", -1, 10, false).await,
        Err(LedgerError::InvalidPageRequest(_))
    ));
    assert!(matches!(
        ledger.pull("alice:bob", 0, -3, false).await,
        Err(LedgerError::InvalidPageRequest(_))
    ));
}
