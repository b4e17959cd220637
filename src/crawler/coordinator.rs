//! Crawl coordinator - the breadth-first crawl loop
//!
//! The coordinator owns the frontier and both index stores for the duration
//! of a crawl. Each dequeued URL is checked against robots.txt, fetched once
//! the politeness delay has passed since the previous fetch finished, parsed,
//! tokenized and recorded; its in-scope links
//! go back on the frontier. Every per-page failure is logged and counted,
//! never propagated.

use crate::config::Config;
use crate::crawler::frontier::{effective_delay, Frontier, Politeness};
use crate::crawler::parser::parse_html;
use crate::crawler::stats::CrawlStats;
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::index::{InvertedIndex, PageStore};
use crate::robots::{fetch_robots, ParsedRobots};
use crate::state::{CrawlPhase, PageState};
use crate::storage::IndexStorage;
use crate::tokenizer::tokenize;
use crate::url::{is_within_base, normalize_url};
use crate::{QuarryError, Result};
use chrono::Utc;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// Set to true to stop a running crawl before its next dequeue
pub type ShutdownSignal = Arc<AtomicBool>;

/// Processed pages between progress log lines
const PROGRESS_INTERVAL: u64 = 10;

/// Saves the stores every `interval` indexed pages
struct Checkpoint {
    interval: u64,
    storage: Arc<dyn IndexStorage + Send + Sync>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    base_url: String,
    /// robots.txt product token
    agent: String,
    client: Client,
    respect_robots: bool,
    robots: ParsedRobots,
    politeness: Politeness,
    max_pages: Option<u64>,
    checkpoint: Option<Checkpoint>,
    shutdown: ShutdownSignal,

    phase: CrawlPhase,
    frontier: Frontier,
    pages: PageStore,
    index: InvertedIndex,
    stats: CrawlStats,
}

impl Coordinator {
    /// Creates an idle coordinator with empty stores
    pub fn new(config: &Config, shutdown: ShutdownSignal) -> Result<Self> {
        let crawler = &config.crawler;
        let client = build_http_client(&config.user_agent, crawler.fetch_timeout())?;

        Ok(Self {
            base_url: normalize_url(&crawler.base_url)?,
            agent: config.user_agent.crawler_name.clone(),
            client,
            respect_robots: crawler.respect_robots,
            robots: ParsedRobots::allow_all(),
            politeness: Politeness::new(crawler.politeness_delay()),
            max_pages: crawler.max_pages.map(u64::from),
            checkpoint: None,
            shutdown,
            phase: CrawlPhase::Idle,
            frontier: Frontier::new(),
            pages: PageStore::new(),
            index: InvertedIndex::new(),
            stats: CrawlStats::new(),
        })
    }

    /// Enables periodic saves; an interval of 0 leaves them off
    pub fn with_checkpoints(
        mut self,
        interval: u32,
        storage: Arc<dyn IndexStorage + Send + Sync>,
    ) -> Self {
        self.checkpoint = (interval > 0).then(|| Checkpoint {
            interval: u64::from(interval),
            storage,
        });
        self
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn pages(&self) -> &PageStore {
        &self.pages
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Hands over the page table and index built so far
    pub fn into_stores(self) -> (PageStore, InvertedIndex) {
        (self.pages, self.index)
    }

    /// Crawls from `seed` until the frontier is empty or the crawl is stopped
    ///
    /// A coordinator runs once; calling this again fails with
    /// [`QuarryError::InvalidTransition`].
    pub async fn run(&mut self, seed: &str) -> Result<CrawlStats> {
        let seed = normalize_url(seed)?;
        if !is_within_base(&seed, &self.base_url) {
            return Err(QuarryError::SeedOutsideBase {
                seed,
                base: self.base_url.clone(),
            });
        }

        self.transition(CrawlPhase::Running)?;
        self.stats = CrawlStats::new();
        tracing::info!("Starting crawl of {} from {}", self.base_url, seed);

        if self.respect_robots {
            self.robots = fetch_robots(&self.client, &self.base_url).await;
            let delay = effective_delay(self.politeness.delay(), &self.robots, &self.agent);
            if delay > self.politeness.delay() {
                tracing::info!("robots.txt Crawl-delay raises politeness delay to {:?}", delay);
                self.politeness = Politeness::new(delay);
            }
        }

        self.frontier.push(seed);

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                tracing::info!("Shutdown requested, stopping crawl");
                self.stats.interrupted = true;
                break;
            }

            if self.max_pages.is_some_and(|max| self.stats.fetches >= max) {
                tracing::info!("Reached max-pages limit of {}", self.stats.fetches);
                self.stats.interrupted = self.frontier.has_unvisited();
                break;
            }

            let Some(url) = self.frontier.next_unvisited() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            let state = self.process_url(&url).await;
            self.stats.record(state);

            if state.is_success() {
                self.maybe_checkpoint();
            }

            if self.stats.processed() % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Progress: {} pages processed, {} indexed, {} in frontier, {:.2} pages/sec",
                    self.stats.processed(),
                    self.stats.indexed(),
                    self.frontier.len(),
                    self.stats.rate()
                );
            }
        }

        self.transition(CrawlPhase::Done)?;
        self.stats.finished_at = Some(Utc::now());

        tracing::info!(
            "Crawl finished: {} indexed, {} errors, {} skipped in {:?}",
            self.stats.indexed(),
            self.stats.errors(),
            self.stats.count(PageState::RobotsDenied),
            self.stats.elapsed()
        );

        Ok(self.stats.clone())
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(QuarryError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Processes one dequeued URL and returns its outcome
    async fn process_url(&mut self, url: &str) -> PageState {
        if self.respect_robots && !self.robots.is_allowed(url, &self.agent) {
            tracing::info!("URL {} disallowed by robots.txt", url);
            return PageState::RobotsDenied;
        }

        self.politeness.wait_turn().await;
        self.stats.fetches += 1;
        tracing::debug!("Fetching {}", url);

        let result = fetch_url(&self.client, url).await;
        self.politeness.fetch_finished();
        match &result {
            FetchResult::Success {
                final_url, body, ..
            } => return self.index_page(url, final_url, body),
            FetchResult::HttpError { status_code, .. } => {
                tracing::warn!("HTTP {} for {}", status_code, url);
            }
            FetchResult::ContentMismatch { content_type } => {
                tracing::warn!("Skipping {}: not HTML ({})", url, content_type);
            }
            FetchResult::NetworkError { error, .. } => {
                tracing::warn!("Failed to fetch {}: {}", url, error);
            }
        }
        result.page_state()
    }

    /// Tokenizes and records a fetched page, then queues its links
    fn index_page(&mut self, url: &str, final_url: &str, body: &str) -> PageState {
        if !is_within_base(final_url, &self.base_url) {
            tracing::warn!("{} redirected outside the site to {}", url, final_url);
            return PageState::Failed;
        }

        let page_url = match Url::parse(final_url) {
            Ok(page_url) => page_url,
            Err(e) => {
                tracing::warn!("Cannot resolve links of {}: {}", final_url, e);
                return PageState::Failed;
            }
        };

        let parsed = parse_html(body, &page_url);
        let tokens = tokenize(&parsed.text);

        let page_id = self.pages.register_url(url);
        if let Err(e) = self.index.record(page_id, &tokens) {
            tracing::warn!("Not indexing {}: {}", url, e);
            return PageState::Failed;
        }

        tracing::debug!(
            "Indexed page {} ({}): {} tokens, {} links, title {:?}",
            page_id,
            url,
            tokens.len(),
            parsed.links.len(),
            parsed.title
        );

        for link in parsed.links {
            let Ok(target) = normalize_url(&link) else {
                continue;
            };
            if !is_within_base(&target, &self.base_url) {
                tracing::trace!("Ignoring off-site link {}", target);
                continue;
            }
            self.stats.links_discovered += 1;
            self.frontier.push(target);
        }

        PageState::Indexed
    }

    fn maybe_checkpoint(&self) {
        let Some(checkpoint) = &self.checkpoint else {
            return;
        };
        if self.stats.indexed() % checkpoint.interval != 0 {
            return;
        }

        match checkpoint.storage.save(&self.pages, &self.index) {
            Ok(()) => tracing::info!("Checkpoint saved at {} indexed pages", self.stats.indexed()),
            Err(e) => tracing::warn!("Checkpoint failed: {}", e),
        }
    }
}
