//! Crawl frontier
//!
//! The frontier owns the discovered-URL set and the FIFO traversal queue of
//! one crawl. Admission (the duplicate, depth, and budget checks plus the
//! insert) happens under a single lock, so concurrent callers can never
//! enqueue the same URL twice.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: Url,
    pub depth: u32,
}

#[derive(Debug, Default)]
struct FrontierState {
    discovered: HashSet<Url>,
    queue: VecDeque<CrawlTask>,
    closed: bool,
}

/// Breadth-first queue with deduplication, a depth bound, and a page budget
#[derive(Debug)]
pub struct Frontier {
    max_pages: usize,
    max_depth: u32,
    state: Mutex<FrontierState>,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `max_pages` - Maximum number of distinct URLs ever admitted
    /// * `max_depth` - Deepest depth admitted (the seed is depth 0)
    pub fn new(max_pages: usize, max_depth: u32) -> Self {
        Self {
            max_pages,
            max_depth,
            state: Mutex::new(FrontierState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Offers a URL for crawling
    ///
    /// Returns `true` if the URL was admitted. A URL is rejected when the
    /// frontier is closed, `depth` exceeds the depth bound, the URL was
    /// already discovered, or the page budget is used up. Admission marks the
    /// URL discovered and appends it to the back of the queue.
    pub fn enqueue(&self, url: Url, depth: u32) -> bool {
        if depth > self.max_depth {
            return false;
        }

        let mut state = self.lock();
        if state.closed
            || state.discovered.len() >= self.max_pages
            || state.discovered.contains(&url)
        {
            return false;
        }

        state.discovered.insert(url.clone());
        state.queue.push_back(CrawlTask { url, depth });
        true
    }

    /// Takes the oldest queued task
    pub fn dequeue(&self) -> Option<CrawlTask> {
        self.lock().queue.pop_front()
    }

    /// Stops admitting new URLs; queued tasks remain
    pub fn close(&self) {
        self.lock().closed = true;
    }

    /// Drops every queued task and returns how many were dropped
    pub fn clear(&self) -> usize {
        let mut state = self.lock();
        let dropped = state.queue.len();
        state.queue.clear();
        dropped
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn is_budget_reached(&self) -> bool {
        self.lock().discovered.len() >= self.max_pages
    }

    /// Number of distinct URLs admitted so far
    pub fn discovered_count(&self) -> usize {
        self.lock().discovered.len()
    }

    pub fn is_discovered(&self, url: &Url) -> bool {
        self.lock().discovered.contains(url)
    }

    /// Number of queued tasks
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://example.com{}", path)).unwrap()
    }

    #[test]
    fn test_fifo_order() {
        let frontier = Frontier::new(100, 10);
        assert!(frontier.enqueue(url("/"), 0));
        assert!(frontier.enqueue(url("/a"), 1));
        assert!(frontier.enqueue(url("/b"), 1));

        assert_eq!(frontier.dequeue().unwrap().url, url("/"));
        assert!(frontier.enqueue(url("/a/x"), 2));
        assert_eq!(frontier.dequeue().unwrap().url, url("/a"));
        assert_eq!(frontier.dequeue().unwrap().url, url("/b"));

        let last = frontier.dequeue().unwrap();
        assert_eq!(last.url, url("/a/x"));
        assert_eq!(last.depth, 2);
        assert!(frontier.dequeue().is_none());
    }

    #[test]
    fn test_breadth_first_depths() {
        let frontier = Frontier::new(100, 10);
        frontier.enqueue(url("/"), 0);

        let mut popped = Vec::new();
        let mut next_id = 0;
        while let Some(task) = frontier.dequeue() {
            popped.push(task.depth);
            if task.depth < 3 {
                for _ in 0..2 {
                    next_id += 1;
                    frontier.enqueue(url(&format!("/p{}", next_id)), task.depth + 1);
                }
            }
        }

        assert_eq!(popped.len(), 15);
        assert!(popped.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_duplicates_rejected() {
        let frontier = Frontier::new(100, 10);
        assert!(frontier.enqueue(url("/a"), 1));
        assert!(!frontier.enqueue(url("/a"), 1));
        assert!(!frontier.enqueue(url("/a"), 0));

        frontier.dequeue();
        assert!(!frontier.enqueue(url("/a"), 1));
        assert_eq!(frontier.discovered_count(), 1);
    }

    #[test]
    fn test_depth_bound() {
        let frontier = Frontier::new(100, 1);
        assert!(frontier.enqueue(url("/"), 0));
        assert!(frontier.enqueue(url("/a"), 1));
        assert!(!frontier.enqueue(url("/a/b"), 2));
        assert!(!frontier.is_discovered(&url("/a/b")));
    }

    #[test]
    fn test_page_budget() {
        let frontier = Frontier::new(3, 10);
        for i in 0..5 {
            frontier.enqueue(url(&format!("/{}", i)), 1);
        }

        assert_eq!(frontier.discovered_count(), 3);
        assert_eq!(frontier.len(), 3);
        assert!(frontier.is_budget_reached());
    }

    #[test]
    fn test_close_and_clear() {
        let frontier = Frontier::new(100, 10);
        frontier.enqueue(url("/a"), 1);
        frontier.enqueue(url("/b"), 1);

        frontier.close();
        assert!(frontier.is_closed());
        assert!(!frontier.enqueue(url("/c"), 1));
        assert_eq!(frontier.len(), 2);

        assert_eq!(frontier.clear(), 2);
        assert!(frontier.is_empty());
        assert_eq!(frontier.discovered_count(), 2);
    }

    #[test]
    fn test_concurrent_enqueue_admits_once() {
        let frontier = Arc::new(Frontier::new(1000, 10));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let frontier = Arc::clone(&frontier);
                std::thread::spawn(move || {
                    (0..100)
                        .filter(|i| frontier.enqueue(url(&format!("/{}", i)), 1))
                        .count()
                })
            })
            .collect();

        let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(accepted, 100);
        assert_eq!(frontier.discovered_count(), 100);
        assert_eq!(frontier.len(), 100);
    }
}
