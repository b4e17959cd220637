//! Crawl frontier and fetch pacing
//!
//! The frontier is a FIFO worklist plus the set of URLs already dequeued.
//! A URL may sit in the queue more than once, but it is handed out at most
//! once; later copies are dropped when they reach the front.

use crate::robots::ParsedRobots;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tokio::time::Instant;

/// Breadth-first worklist of normalized URLs
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be processed, oldest first
    queue: VecDeque<String>,

    /// URLs already handed out for processing
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a URL unless it has already been visited
    ///
    /// Returns true when the URL was queued.
    pub fn push(&mut self, url: String) -> bool {
        if self.visited.contains(&url) {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    /// Takes the next unvisited URL and marks it visited
    ///
    /// Duplicates met on the way are discarded. Returns None once the queue
    /// is exhausted.
    pub fn next_unvisited(&mut self) -> Option<String> {
        while let Some(url) = self.queue.pop_front() {
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
            tracing::trace!("Skipping already visited {}", url);
        }
        None
    }

    /// Returns true if the URL has been handed out
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of URLs handed out so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of queued entries, duplicates included
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true when nothing is queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns true if some queued URL has not been handed out yet
    pub fn has_unvisited(&self) -> bool {
        self.queue.iter().any(|url| !self.visited.contains(url))
    }
}

/// Upper bound on a delay taken from robots.txt
pub const MAX_CRAWL_DELAY: Duration = Duration::from_secs(60);

/// Enforces a fixed pause after each fetch
///
/// The pause runs from the moment a fetch finished, so a slow response
/// never shortens the gap before the next request.
#[derive(Debug)]
pub struct Politeness {
    delay: Duration,
    last_finished: Option<Instant>,
}

impl Politeness {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_finished: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleeps until `delay` has passed since the previous fetch finished
    ///
    /// Returns immediately before the first fetch.
    pub async fn wait_turn(&self) {
        let Some(finished) = self.last_finished else {
            return;
        };
        let ready_at = finished + self.delay;
        if ready_at > Instant::now() {
            tracing::trace!("Waiting {:?} before next fetch", ready_at - Instant::now());
            tokio::time::sleep_until(ready_at).await;
        }
    }

    /// Marks the end of a fetch; the next turn waits the full delay from now
    pub fn fetch_finished(&mut self) {
        self.last_finished = Some(Instant::now());
    }
}

/// The larger of the configured delay and the robots.txt Crawl-delay
///
/// A Crawl-delay above [`MAX_CRAWL_DELAY`] is clamped to it.
pub fn effective_delay(configured: Duration, robots: &ParsedRobots, agent: &str) -> Duration {
    let robots_delay = robots
        .crawl_delay(agent)
        .map(|seconds| {
            Duration::try_from_secs_f64(seconds).unwrap_or_else(|_| {
                if seconds > 0.0 {
                    Duration::MAX
                } else {
                    Duration::ZERO
                }
            })
        })
        .unwrap_or(Duration::ZERO);

    let robots_delay = if robots_delay > MAX_CRAWL_DELAY {
        tracing::warn!(
            "robots.txt Crawl-delay of {:?} capped at {:?}",
            robots_delay,
            MAX_CRAWL_DELAY
        );
        MAX_CRAWL_DELAY
    } else {
        robots_delay
    };

    configured.max(robots_delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_frontier_is_empty() {
        let mut frontier = Frontier::new();
        assert!(frontier.is_empty());
        assert_eq!(frontier.next_unvisited(), None);
        assert_eq!(frontier.visited_count(), 0);
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new();
        frontier.push("https://a.test".to_string());
        frontier.push("https://a.test/1".to_string());
        frontier.push("https://a.test/2".to_string());

        assert_eq!(frontier.next_unvisited().as_deref(), Some("https://a.test"));
        assert_eq!(frontier.next_unvisited().as_deref(), Some("https://a.test/1"));
        assert_eq!(frontier.next_unvisited().as_deref(), Some("https://a.test/2"));
    }

    #[test]
    fn test_duplicates_handed_out_once() {
        let mut frontier = Frontier::new();
        frontier.push("https://a.test/x".to_string());
        frontier.push("https://a.test/x".to_string());
        assert_eq!(frontier.len(), 2);

        assert_eq!(frontier.next_unvisited().as_deref(), Some("https://a.test/x"));
        assert_eq!(frontier.next_unvisited(), None);
        assert!(frontier.is_visited("https://a.test/x"));
    }

    #[test]
    fn test_visited_url_not_requeued() {
        let mut frontier = Frontier::new();
        frontier.push("https://a.test".to_string());
        frontier.next_unvisited();

        assert!(!frontier.push("https://a.test".to_string()));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_has_unvisited_ignores_queued_duplicates() {
        let mut frontier = Frontier::new();
        frontier.push("https://a.test/x".to_string());
        frontier.push("https://a.test/x".to_string());
        assert!(frontier.has_unvisited());

        frontier.next_unvisited();
        assert!(!frontier.is_empty());
        assert!(!frontier.has_unvisited());
    }

    #[tokio::test]
    async fn test_first_turn_does_not_wait() {
        let politeness = Politeness::new(Duration::from_secs(60));
        let start = Instant::now();
        politeness.wait_turn().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_turn_waits_full_delay_after_fetch_finished() {
        let mut politeness = Politeness::new(Duration::from_millis(50));
        politeness.wait_turn().await;
        // a slow fetch longer than the delay itself
        tokio::time::sleep(Duration::from_millis(80)).await;
        politeness.fetch_finished();

        let start = Instant::now();
        politeness.wait_turn().await;
        assert!(start.elapsed() >= Duration::from_millis(45));
    }

    #[test]
    fn test_effective_delay_prefers_longer() {
        let robots = ParsedRobots::from_content("User-agent: *\nCrawl-delay: 2");
        assert_eq!(
            effective_delay(Duration::from_millis(500), &robots, "Quarry"),
            Duration::from_secs(2)
        );
        assert_eq!(
            effective_delay(Duration::from_secs(6), &robots, "Quarry"),
            Duration::from_secs(6)
        );
    }

    #[test]
    fn test_effective_delay_caps_huge_crawl_delay() {
        let robots = ParsedRobots::from_content("User-agent: *\nCrawl-delay: 1e9");
        assert_eq!(
            effective_delay(Duration::from_millis(500), &robots, "Quarry"),
            MAX_CRAWL_DELAY
        );
    }

    #[test]
    fn test_effective_delay_without_robots() {
        assert_eq!(
            effective_delay(Duration::from_millis(100), &ParsedRobots::allow_all(), "Quarry"),
            Duration::from_millis(100)
        );
    }
}
