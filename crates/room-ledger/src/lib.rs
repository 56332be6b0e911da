//! # Room Ledger
//!
//! Message addressing and pagination for a two-party chat relay.
//!
//! ## Principles
//!
//! - **Rooms are derived, never registered** - a room key is a pure function of the
//!   two participants named in the chat descriptor
//! - **The store owns ordering** - every room is one ordered collection scored by
//!   timestamp; ranks are computed on read
//! - **Reads are stateless** - the cursor is a caller-held rank offset
//! - **Nothing is retried here** - store faults surface to the caller as-is
//!
//! ## Architecture
//!
//! ```text
//! SEND:
//!   chat descriptor -> membership check -> room key -> ZADD(room, ts, payload)
//!
//! PULL:
//!   chat descriptor -> room key -> range by rank [cursor, cursor + limit] -> page policy
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use room_ledger::{Ledger, MemoryStore};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let ledger = Ledger::new(Arc::new(MemoryStore::new()));
//! ledger.send("alice:bob", "alice", "hi").await.unwrap();
//!
//! // Same room, whatever the order or casing of the participants
//! let page = ledger.pull("Bob:Alice", 0, 10, false).await.unwrap();
//! assert_eq!(page.messages.len(), 1);
//! assert_eq!(page.messages[0].sender, "alice");
//! # });
//! ```

mod error;
mod ledger;
pub mod pagination;
pub mod resolver;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{LedgerError, LedgerResult};
pub use ledger::{Clock, Ledger, LedgerOptions, SystemClock};
pub use pagination::{PagePolicy, RankWindow};
pub use resolver::{resolve_room, split_chat};
pub use store::{MemoryStore, OrderedStore, RedisStore, SqliteStore, StoreError, StoreResult};
pub use types::{ChatMessage, Message, Page, RoomKey};
