//! Breadth-first frontier with test-and-mark dispatch
//!
//! Tracks which URLs are known (queued or visited) so that no URL is handed
//! out twice within one run. URLs are marked visited when they are taken,
//! not when their fetch completes.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting in the frontier together with its link depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// Normalized URL
    pub url: Url,

    /// Number of link hops from the seed (sitemap entries count as 0)
    pub depth: u32,
}

/// FIFO frontier and visited set for one traversal run
///
/// Invariants:
/// - a URL is never both queued and visited
/// - the visited set never grows past `max_urls`
/// - entries are queued in non-decreasing depth order
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<QueuedUrl>,
    queued: HashSet<String>,
    visited: HashSet<String>,
    max_urls: usize,
}

impl Frontier {
    /// Creates an empty frontier that will visit at most `max_urls` URLs
    pub fn new(max_urls: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            max_urls,
        }
    }

    /// Queues a URL unless it is already known
    ///
    /// Returns true if the URL was newly added.
    pub fn offer(&mut self, url: Url, depth: u32) -> bool {
        let key = url.as_str();
        if self.visited.contains(key) || self.queued.contains(key) {
            return false;
        }

        debug_assert!(
            self.queue.back().map_or(true, |last| last.depth <= depth),
            "frontier depth order violated"
        );

        self.queued.insert(key.to_string());
        self.queue.push_back(QueuedUrl { url, depth });
        true
    }

    /// Removes up to `n` URLs at `depth` from the front and marks them visited
    ///
    /// Stops early at a layer boundary or once the visited cap is reached,
    /// so the result may be shorter than `n` or empty.
    pub fn take_batch(&mut self, n: usize, depth: u32) -> Vec<QueuedUrl> {
        let room = self.max_urls.saturating_sub(self.visited.len());
        let mut batch = Vec::with_capacity(n.min(room));

        while batch.len() < n && batch.len() < room {
            match self.queue.front() {
                Some(front) if front.depth == depth => {}
                _ => break,
            }
            let Some(entry) = self.queue.pop_front() else {
                break;
            };

            let key = entry.url.as_str();
            self.queued.remove(key);
            self.visited.insert(key.to_string());
            batch.push(entry);
        }

        batch
    }

    /// Depth of the next URL to be taken
    pub fn next_depth(&self) -> Option<u32> {
        self.queue.front().map(|entry| entry.depth)
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// True once the visited set has reached `max_urls`
    pub fn at_capacity(&self) -> bool {
        self.visited.len() >= self.max_urls
    }
}
