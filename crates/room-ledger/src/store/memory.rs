//! In-process ordered store.

use super::{clamp_rank_range, OrderedStore, StoreResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy)]
struct Score(f64);

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Default)]
struct Collection {
    ranked: BTreeSet<(Score, Vec<u8>)>,
    scores: HashMap<Vec<u8>, Score>,
}

impl Collection {
    fn insert(&mut self, score: Score, member: &[u8]) {
        if let Some(previous) = self.scores.insert(member.to_vec(), score) {
            self.ranked.remove(&(previous, member.to_vec()));
        }
        self.ranked.insert((score, member.to_vec()));
    }

    fn range(&self, start: i64, end: i64, descending: bool) -> Vec<Vec<u8>> {
        let Some((start, end)) = clamp_rank_range(start, end, self.ranked.len()) else {
            return Vec::new();
        };
        let take = end - start + 1;

        if descending {
            self.ranked
                .iter()
                .rev()
                .skip(start)
                .take(take)
                .map(|(_, member)| member.clone())
                .collect()
        } else {
            self.ranked
                .iter()
                .skip(start)
                .take(take)
                .map(|(_, member)| member.clone())
                .collect()
        }
    }
}

/// Ordered store held in memory.
///
/// Used by tests and by `--store memory` for throwaway relays.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(|c| c.ranked.len())
            .unwrap_or(0)
    }

    /// Names of all collections that hold at least one member.
    pub fn collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl OrderedStore for MemoryStore {
    async fn append(&self, collection: &str, score: f64, member: &[u8]) -> StoreResult<()> {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(Score(score), member);
        Ok(())
    }

    async fn range_by_rank(
        &self,
        collection: &str,
        start: i64,
        end: i64,
        descending: bool,
    ) -> StoreResult<Vec<Vec<u8>>> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .map(|c| c.range(start, end, descending))
            .unwrap_or_default())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_orders_by_score_then_member() {
        let store = MemoryStore::new();
        store.append("room", 2.0, b"b").await.unwrap();
        store.append("room", 1.0, b"z").await.unwrap();
        store.append("room", 2.0, b"a").await.unwrap();

        let asc = store.range_by_rank("room", 0, -1, false).await.unwrap();
        assert_eq!(asc, vec![b"z".to_vec(), b"a".to_vec(), b"b".to_vec()]);

        let desc = store.range_by_rank("room", 0, -1, true).await.unwrap();
        assert_eq!(desc, vec![b"b".to_vec(), b"a".to_vec(), b"z".to_vec()]);
    }

    #[tokio::test]
    async fn test_reappend_updates_score() {
        let store = MemoryStore::new();
        store.append("room", 5.0, b"x").await.unwrap();
        store.append("room", 1.0, b"y").await.unwrap();
        store.append("room", 0.0, b"x").await.unwrap();

        assert_eq!(store.len("room"), 2);
        let asc = store.range_by_rank("room", 0, 1, false).await.unwrap();
        assert_eq!(asc, vec![b"x".to_vec(), b"y".to_vec()]);
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty() {
        let store = MemoryStore::new();
        assert!(store
            .range_by_rank("nobody", 0, 10, false)
            .await
            .unwrap()
            .is_empty());
        assert!(store.collections().is_empty());
    }

    #[tokio::test]
    async fn test_window_past_end() {
        let store = MemoryStore::new();
        for i in 0..3u8 {
            store.append("room", f64::from(i), &[i]).await.unwrap();
        }
        assert_eq!(
            store.range_by_rank("room", 1, 100, false).await.unwrap(),
            vec![vec![1u8], vec![2u8]]
        );
        assert!(store.range_by_rank("room", 3, 5, false).await.unwrap().is_empty());
    }
}
