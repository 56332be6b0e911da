//! The ledger - send and pull over one ordered collection per room.
//!
//! # Send (strict order)
//!
//! 1. Split the chat descriptor and check the sender is one of its two participants
//! 2. Resolve the room key
//! 3. Stamp the message with the clock
//! 4. Append the payload, scored by its timestamp
//!
//! If any step fails, nothing is written.
//!
//! # Pull
//!
//! Resolve the room, read the rank window `[cursor, cursor + limit]`, decode
//! every candidate, then let the configured [`PagePolicy`] cut the page.
//! Pulls never check membership and never write.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::pagination::{PagePolicy, RankWindow};
use crate::resolver::{resolve_room, split_chat};
use crate::store::{OrderedStore, StoreError};
use crate::types::{ChatMessage, Message, Page, RoomKey};

/// Source of message timestamps, in unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Ledger tuning.
#[derive(Debug, Clone, Default)]
pub struct LedgerOptions {
    /// How fetched windows are cut into pages.
    pub policy: PagePolicy,
    /// Prepended to every room key to form the collection name.
    pub key_prefix: String,
}

/// Stateless message ledger over an [`OrderedStore`].
///
/// Cloning is cheap; clones share the store and clock.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn OrderedStore>,
    clock: Arc<dyn Clock>,
    options: LedgerOptions,
}

impl Ledger {
    /// Creates a ledger with the legacy page policy and no key prefix.
    pub fn new(store: Arc<dyn OrderedStore>) -> Self {
        Self::with_options(store, LedgerOptions::default())
    }

    pub fn with_options(store: Arc<dyn OrderedStore>, options: LedgerOptions) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            options,
        }
    }

    /// Replaces the clock used to stamp new messages.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn policy(&self) -> PagePolicy {
        self.options.policy
    }

    /// Name of the backing store, for logs and health output.
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Collection that holds a room's messages.
    pub fn collection_name(&self, room: &RoomKey) -> String {
        format!("{}{}", self.options.key_prefix, room.as_str())
    }

    /// Appends a message from `sender` to the room named by `chat`.
    ///
    /// `sender` must match one of the two participants exactly, case included.
    pub async fn send(&self, chat: &str, sender: &str, text: &str) -> LedgerResult<Message> {
        let (first, second) = split_chat(chat)?;
        if sender != first && sender != second {
            return Err(LedgerError::NotAMember {
                sender: sender.to_string(),
                chat: chat.to_string(),
            });
        }

        let room = resolve_room(chat)?;
        let collection = self.collection_name(&room);
        let message = Message::new(sender, text, self.clock.now());

        let payload = message.to_payload().map_err(|e| StoreError::Malformed {
            collection: collection.clone(),
            reason: e.to_string(),
        })?;

        if let Err(e) = self
            .store
            .append(&collection, message.timestamp as f64, &payload)
            .await
        {
            warn!(room = %room, error = %e, "Failed to append message");
            return Err(e.into());
        }

        debug!(
            room = %room,
            sender = %sender,
            timestamp = message.timestamp,
            "Message appended"
        );
        Ok(message)
    }

    /// Reads one page of the room named by `chat`.
    ///
    /// `reverse` ranks the whole room newest first before the window is
    /// applied.
    pub async fn pull(
        &self,
        chat: &str,
        cursor: i64,
        limit: i32,
        reverse: bool,
    ) -> LedgerResult<Page> {
        let room = resolve_room(chat)?;
        let window = RankWindow::new(cursor, limit)?;
        let collection = self.collection_name(&room);

        let raw = self
            .store
            .range_by_rank(&collection, window.start, window.end, reverse)
            .await
            .inspect_err(|e| warn!(room = %room, error = %e, "Failed to read room"))?;

        let candidates = raw
            .iter()
            .map(|payload| {
                Message::from_payload(payload).map_err(|e| StoreError::Malformed {
                    collection: collection.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let fetched = candidates.len();
        let cut = self.options.policy.cut(window, limit, candidates);

        debug!(
            room = %room,
            cursor,
            limit,
            reverse,
            fetched,
            count = cut.items.len(),
            has_more = cut.has_more,
            "Pulled page"
        );

        Ok(Page {
            messages: cut
                .items
                .into_iter()
                .map(|message| ChatMessage::from_stored(chat, message))
                .collect(),
            has_more: cut.has_more,
            next_cursor: cut.next_cursor,
        })
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("backend", &self.store.backend())
            .field("options", &self.options)
            .finish()
    }
}
