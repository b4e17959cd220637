//! Per-crawl counters

use crate::state::PageState;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

/// Summary of one crawl
#[derive(Debug, Clone)]
pub struct CrawlStats {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Outcome counts for every processed URL
    pub pages_by_state: BTreeMap<PageState, u64>,

    /// HTTP fetches attempted (robots.txt excluded)
    pub fetches: u64,

    /// In-scope links seen across all indexed pages, duplicates included
    pub links_discovered: u64,

    /// Set when the crawl stopped before the frontier ran dry
    pub interrupted: bool,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_by_state: BTreeMap::new(),
            fetches: 0,
            links_discovered: 0,
            interrupted: false,
        }
    }

    /// Counts one processed URL
    pub fn record(&mut self, state: PageState) {
        *self.pages_by_state.entry(state).or_insert(0) += 1;
    }

    pub fn count(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    /// URLs processed in any state
    pub fn processed(&self) -> u64 {
        self.pages_by_state.values().sum()
    }

    pub fn indexed(&self) -> u64 {
        self.count(PageState::Indexed)
    }

    pub fn errors(&self) -> u64 {
        self.pages_by_state
            .iter()
            .filter(|(state, _)| state.is_error())
            .map(|(_, count)| count)
            .sum()
    }

    /// Wall time from start to finish, or to now while running
    pub fn elapsed(&self) -> Duration {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).to_std().unwrap_or_default()
    }

    /// Processed URLs per second
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.processed() as f64 / secs
        } else {
            0.0
        }
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}
