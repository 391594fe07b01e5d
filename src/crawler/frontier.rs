//! Breadth-first frontier and visited set for one crawl run

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be crawled, with its distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,

    /// Link hops from the seed (the seed itself is depth 0)
    pub depth: u32,
}

/// FIFO queue of pending entries plus the set of visited keys
///
/// The visited set only grows. Keys are normalized URLs; the frontier
/// itself stores URLs as discovered, so the same page may sit in the queue
/// more than once and is skipped when popped a second time.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding only the seed, at depth 0
    pub fn new(seed: Url) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed, 0);
        frontier
    }

    /// Removes the oldest entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    pub fn push(&mut self, url: Url, depth: u32) {
        self.queue.push_back(FrontierEntry { url, depth });
    }

    /// Records a key as visited; returns false if it already was
    pub fn mark_visited(&mut self, key: String) -> bool {
        self.visited.insert(key)
    }

    pub fn is_visited(&self, key: &str) -> bool {
        self.visited.contains(key)
    }

    /// Number of entries still queued
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
