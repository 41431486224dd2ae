//! URL frontier: scoped, depth-bounded, deduplicating FIFO queue
//!
//! The frontier is the single source of truth for which URLs a run will
//! visit. Candidates are normalized and filtered at enqueue time; a URL is
//! marked visited when it is dequeued, so a page linked from several pages
//! before it is processed is still queued and yielded exactly once.

use crate::url::{normalize_url, Scope};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting in the frontier together with its discovery depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The normalized URL
    pub url: Url,

    /// Number of link hops from the seed (0 for seeds and sitemap entries)
    pub depth: u32,
}

/// Breadth-first traversal queue with a visited set
#[derive(Debug)]
pub struct Frontier {
    pending: VecDeque<QueuedUrl>,
    pending_keys: HashSet<String>,
    visited: HashSet<String>,
    scope: Scope,
    max_depth: u32,
    max_urls: usize,
    enqueued: usize,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `scope` - Boundary every accepted URL must fall under
    /// * `max_depth` - Deepest accepted discovery depth (0 = unlimited)
    /// * `max_urls` - Maximum number of URLs ever accepted (0 = unlimited)
    pub fn new(scope: Scope, max_depth: u32, max_urls: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            pending_keys: HashSet::new(),
            visited: HashSet::new(),
            scope,
            max_depth,
            max_urls,
            enqueued: 0,
        }
    }

    /// Offers a candidate URL at the given depth
    ///
    /// Returns `true` if the candidate was appended. The call is a no-op
    /// returning `false` when the candidate does not normalize, lies outside
    /// the scope, was already seen, is deeper than `max_depth`, or when the
    /// frontier already accepted `max_urls` URLs.
    pub fn enqueue(&mut self, candidate: &str, depth: u32) -> bool {
        let url = match normalize_url(candidate) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Rejected {}: {}", candidate, e);
                return false;
            }
        };

        if !self.scope.contains(&url) {
            tracing::trace!("Out of scope: {}", url);
            return false;
        }

        let key = url.as_str().to_string();
        if self.visited.contains(&key) || self.pending_keys.contains(&key) {
            return false;
        }

        if !self.accepts_depth(depth) {
            tracing::trace!("Depth {} exceeds limit for {}", depth, url);
            return false;
        }

        if self.is_full() {
            tracing::debug!("URL limit of {} reached, dropping {}", self.max_urls, url);
            return false;
        }

        self.pending_keys.insert(key);
        self.pending.push_back(QueuedUrl { url, depth });
        self.enqueued += 1;
        true
    }

    /// Removes the oldest pending URL and marks it visited
    pub fn dequeue(&mut self) -> Option<QueuedUrl> {
        let next = self.pending.pop_front()?;
        let key = next.url.as_str().to_string();
        self.pending_keys.remove(&key);
        self.visited.insert(key);
        Some(next)
    }

    /// Returns true if a URL at `depth` would pass the depth bound
    pub fn accepts_depth(&self, depth: u32) -> bool {
        self.max_depth == 0 || depth <= self.max_depth
    }

    /// Returns true once `max_urls` URLs have been accepted
    pub fn is_full(&self) -> bool {
        self.max_urls > 0 && self.enqueued >= self.max_urls
    }

    /// Returns true if no URL is pending
    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of pending URLs
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if no URL is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of URLs dequeued so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of URLs ever accepted
    pub fn enqueued_count(&self) -> usize {
        self.enqueued
    }
}
