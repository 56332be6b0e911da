//! Redis sorted-set store.
//!
//! Each room is one sorted set: `ZADD` appends, `ZRANGE`/`ZREVRANGE` read by
//! rank. Redis breaks score ties by member bytes, which is the ordering the
//! ledger documents.

use super::{OrderedStore, StoreResult};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{Client, RedisResult};
use tracing::{debug, info};

/// Ordered store backed by Redis sorted sets.
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    /// Connect to Redis and verify the connection with `PING`.
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        let client = Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        let store = Self { conn };

        store.ping().await?;
        info!(url = %redis_url, "Connected to Redis");

        Ok(store)
    }

    /// Round-trip a `PING`.
    pub async fn ping(&self) -> StoreResult<()> {
        let pong: String = redis::cmd("PING").query_async(&mut self.conn.clone()).await?;
        debug!(reply = %pong, "Redis ping");
        Ok(())
    }
}

#[async_trait]
impl OrderedStore for RedisStore {
    async fn append(&self, collection: &str, score: f64, member: &[u8]) -> StoreResult<()> {
        // ZADD key score member
        let added: i64 = redis::cmd("ZADD")
            .arg(collection)
            .arg(score)
            .arg(member)
            .query_async(&mut self.conn.clone())
            .await?;

        debug!(collection = %collection, added, "ZADD");
        Ok(())
    }

    async fn range_by_rank(
        &self,
        collection: &str,
        start: i64,
        end: i64,
        descending: bool,
    ) -> StoreResult<Vec<Vec<u8>>> {
        let command = if descending { "ZREVRANGE" } else { "ZRANGE" };

        let result: RedisResult<Vec<Vec<u8>>> = redis::cmd(command)
            .arg(collection)
            .arg(start)
            .arg(end)
            .query_async(&mut self.conn.clone())
            .await;

        let members = result?;
        debug!(
            collection = %collection,
            command,
            start,
            end,
            count = members.len(),
            "Range by rank"
        );
        Ok(members)
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    // Live commands need a running Redis; only connection setup is covered here.

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let result = RedisStore::connect("not a redis url").await;
        assert!(matches!(result, Err(StoreError::Redis(_))));
    }

    #[tokio::test]
    async fn test_connect_unreachable_server_fails() {
        // Port 1 on loopback is reserved and refuses connections
        let result = RedisStore::connect("redis://127.0.0.1:1").await;
        assert!(result.is_err());
    }
}
