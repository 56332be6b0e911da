//! Rank windows and page policies.
//!
//! A pull fetches the inclusive rank window `[cursor, cursor + limit]`, i.e. up
//! to `limit + 1` candidates, then a [`PagePolicy`] decides which candidates
//! become the page and where the next page starts.

use crate::error::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Inclusive rank range fetched for one pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankWindow {
    pub start: i64,
    pub end: i64,
}

impl RankWindow {
    /// Builds the window for a cursor and limit.
    ///
    /// Ranks are non-negative offsets, so a negative cursor or limit is
    /// rejected rather than handed to a store that may read it from the tail.
    pub fn new(cursor: i64, limit: i32) -> LedgerResult<Self> {
        if cursor < 0 {
            return Err(LedgerError::InvalidPageRequest(format!(
                "cursor must be non-negative, got {cursor}"
            )));
        }
        if limit < 0 {
            return Err(LedgerError::InvalidPageRequest(format!(
                "limit must be non-negative, got {limit}"
            )));
        }

        Ok(Self {
            start: cursor,
            end: cursor.saturating_add(i64::from(limit)),
        })
    }
}

/// How a fetched window is cut into a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePolicy {
    /// Stops emitting once `emitted + 1 >= limit`, so a full page holds at most
    /// `limit - 1` messages, and hands back the window end as the next cursor.
    /// The rank just before the window end is never emitted on a full page.
    #[default]
    Legacy,
    /// Emits up to `limit` messages and reports more only when the lookahead
    /// rank `cursor + limit` exists; chaining visits every rank once.
    Exact,
}

/// The outcome of cutting a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCut<T> {
    pub items: Vec<T>,
    pub has_more: bool,
    pub next_cursor: i64,
}

impl PagePolicy {
    /// Cuts `candidates` (the window's entries, in rank order) into a page.
    pub fn cut<T>(self, window: RankWindow, limit: i32, candidates: Vec<T>) -> PageCut<T> {
        match self {
            PagePolicy::Legacy => cut_legacy(window, limit, candidates),
            PagePolicy::Exact => cut_exact(window, limit, candidates),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PagePolicy::Legacy => "legacy",
            PagePolicy::Exact => "exact",
        }
    }
}

fn cut_legacy<T>(window: RankWindow, limit: i32, candidates: Vec<T>) -> PageCut<T> {
    let limit = i64::from(limit);
    let mut items = Vec::with_capacity(candidates.len());
    let mut has_more = false;
    let mut next_cursor = 0;

    for candidate in candidates {
        let emitted = items.len() as i64;
        if emitted + 1 >= limit {
            has_more = true;
            next_cursor = window.end;
            break;
        }
        items.push(candidate);
    }

    PageCut {
        items,
        has_more,
        next_cursor,
    }
}

fn cut_exact<T>(window: RankWindow, limit: i32, candidates: Vec<T>) -> PageCut<T> {
    let limit = usize::try_from(limit).unwrap_or(0);
    let has_more = candidates.len() > limit;
    let items: Vec<T> = candidates.into_iter().take(limit).collect();

    PageCut {
        items,
        has_more,
        next_cursor: if has_more { window.end } else { 0 },
    }
}

impl FromStr for PagePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(PagePolicy::Legacy),
            "exact" => Ok(PagePolicy::Exact),
            other => Err(format!(
                "unknown page policy '{other}' (expected 'legacy' or 'exact')"
            )),
        }
    }
}

impl std::fmt::Display for PagePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
