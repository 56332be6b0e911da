//! SQLite-backed ordered store.
//!
//! One table holds every collection. `(collection, member)` is the primary key,
//! so re-inserting a member moves it instead of duplicating it, matching
//! sorted-set semantics. Members are BLOBs, which SQLite compares with
//! `memcmp`, giving the same tie order as Redis.

use super::{clamp_rank_range, OrderedStore, StoreError, StoreResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Ordered store persisted to a SQLite database.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens a SQLite database at the given path.
    ///
    /// Creates the database and schema if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> SqliteResult<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::from_connection(conn)
    }

    /// Creates an in-memory SQLite database.
    pub fn in_memory() -> SqliteResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> SqliteResult<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS ordered_entries (
                collection TEXT NOT NULL,
                member BLOB NOT NULL,
                score REAL NOT NULL,
                PRIMARY KEY (collection, member)
            );

            CREATE INDEX IF NOT EXISTS idx_ordered_entries_rank
                ON ordered_entries(collection, score, member);
            "#,
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs a closure against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn count_members(conn: &Connection, collection: &str) -> SqliteResult<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM ordered_entries WHERE collection = ?1",
        params![collection],
        |row| row.get(0),
    )?;
    Ok(usize::try_from(count).unwrap_or(0))
}

#[async_trait]
impl OrderedStore for SqliteStore {
    async fn append(&self, collection: &str, score: f64, member: &[u8]) -> StoreResult<()> {
        let collection = collection.to_string();
        let member = member.to_vec();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO ordered_entries (collection, member, score)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(collection, member) DO UPDATE SET score = excluded.score",
                params![collection, member, score],
            )?;
            Ok(())
        })
        .await
    }

    async fn range_by_rank(
        &self,
        collection: &str,
        start: i64,
        end: i64,
        descending: bool,
    ) -> StoreResult<Vec<Vec<u8>>> {
        let collection = collection.to_string();

        self.with_conn(move |conn| {
            let len = count_members(conn, &collection)?;
            let Some((start, end)) = clamp_rank_range(start, end, len) else {
                return Ok(Vec::new());
            };

            let sql = if descending {
                "SELECT member FROM ordered_entries WHERE collection = ?1
                 ORDER BY score DESC, member DESC LIMIT ?2 OFFSET ?3"
            } else {
                "SELECT member FROM ordered_entries WHERE collection = ?1
                 ORDER BY score ASC, member ASC LIMIT ?2 OFFSET ?3"
            };

            let mut stmt = conn.prepare_cached(sql)?;
            let members = stmt
                .query_map(
                    params![collection, (end - start + 1) as i64, start as i64],
                    |row| row.get::<_, Vec<u8>>(0),
                )?
                .collect::<SqliteResult<Vec<_>>>()?;

            debug!(
                collection = %collection,
                start,
                end,
                count = members.len(),
                "Range by rank"
            );
            Ok(members)
        })
        .await
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_orders_by_score_then_member() {
        let store = SqliteStore::in_memory().unwrap();
        store.append("room", 2.0, b"b").await.unwrap();
        store.append("room", 1.0, b"z").await.unwrap();
        store.append("room", 2.0, b"a").await.unwrap();

        let asc = store.range_by_rank("room", 0, -1, false).await.unwrap();
        assert_eq!(asc, vec![b"z".to_vec(), b"a".to_vec(), b"b".to_vec()]);

        let desc = store.range_by_rank("room", 0, 1, true).await.unwrap();
        assert_eq!(desc, vec![b"b".to_vec(), b"a".to_vec()]);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = SqliteStore::in_memory().unwrap();
        store.append("a:b", 1.0, b"one").await.unwrap();
        store.append("a:c", 1.0, b"two").await.unwrap();

        assert_eq!(
            store.range_by_rank("a:b", 0, 10, false).await.unwrap(),
            vec![b"one".to_vec()]
        );
        assert!(store
            .range_by_rank("b:c", 0, 10, false)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_reappend_moves_member() {
        let store = SqliteStore::in_memory().unwrap();
        store.append("room", 9.0, b"x").await.unwrap();
        store.append("room", 5.0, b"y").await.unwrap();
        store.append("room", 1.0, b"x").await.unwrap();

        let asc = store.range_by_rank("room", 0, -1, false).await.unwrap();
        assert_eq!(asc, vec![b"x".to_vec(), b"y".to_vec()]);
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("relay.sqlite");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.append("room", 1.0, b"kept").await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.range_by_rank("room", 0, 0, false).await.unwrap(),
            vec![b"kept".to_vec()]
        );
    }
}
