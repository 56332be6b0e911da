//! Ordered collection stores.
//!
//! The ledger only needs two operations from its backing store: insert a scored
//! member into a named collection, and read a collection by rank in either
//! direction. Members with equal scores are ordered by their raw bytes, which is
//! what Redis sorted sets do and what every store here reproduces.

mod memory;
mod redis_store;
mod sqlite;

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;
pub use self::sqlite::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

/// Store error type.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Redis connection or command error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A member could not be decoded or encoded
    #[error("Malformed entry in '{collection}': {reason}")]
    Malformed { collection: String, reason: String },

    /// Blocking store task panicked or was cancelled
    #[error("Store task failed: {0}")]
    Task(String),

    /// Store refused the call
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A collection of byte members kept in `(score, member)` order.
#[async_trait]
pub trait OrderedStore: Send + Sync {
    /// Inserts `member` into `collection` with `score`.
    ///
    /// Inserting a member that is already present only updates its score.
    async fn append(&self, collection: &str, score: f64, member: &[u8]) -> StoreResult<()>;

    /// Returns the members ranked `start..=end`.
    ///
    /// With `descending` the whole collection is ranked highest score first.
    /// Negative ranks count from the tail; out-of-range ranks are clamped and an
    /// empty or inverted range yields no members.
    async fn range_by_rank(
        &self,
        collection: &str,
        start: i64,
        end: i64,
        descending: bool,
    ) -> StoreResult<Vec<Vec<u8>>>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Clamps an inclusive rank range against a collection of `len` members.
///
/// Returns `None` when nothing falls in the range.
pub(crate) fn clamp_rank_range(start: i64, end: i64, len: usize) -> Option<(usize, usize)> {
    let len = i64::try_from(len).ok()?;
    if len == 0 {
        return None;
    }

    let start = if start < 0 { (len + start).max(0) } else { start };
    let end = if end < 0 { len + end } else { end.min(len - 1) };

    if start > end || start >= len || end < 0 {
        return None;
    }

    Some((start as usize, end as usize))
}
