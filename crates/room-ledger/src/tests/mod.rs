//! Behaviour tests for the room ledger.
//!
//! - `resolver.rs`   - room identity through the ledger API
//! - `append.rs`     - send path and membership
//! - `pagination.rs` - cursors, limits and chained pulls under both policies
//! - `ordering.rs`   - timestamp order, reverse reads and tie-breaks
//! - `failures.rs`   - store faults and malformed payloads
//! - `stores.rs`     - the same scenario against every local store

mod pagination;
mod resolver;

use crate::{Ledger, MemoryStore};
use std::sync::Arc;

/// Basic workflow test demonstrating core functionality.
#[tokio::test]
async fn basic_workflow() {
    let ledger = Ledger::new(Arc::new(MemoryStore::new()));

    ledger.send("alice:bob", "alice", "hi bob").await.unwrap();
    ledger.send("alice:bob", "bob", "hi alice").await.unwrap();

    let page = ledger.pull("bob:alice", 0, 10, false).await.unwrap();
    assert_eq!(page.messages.len(), 2);
    assert!(!page.has_more);
    assert_eq!(page.next_cursor, 0);
    assert!(page.messages.iter().all(|m| m.chat == "bob:alice"));
}
