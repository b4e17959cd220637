//! The search engine facade
//!
//! [`Engine`] ties the pieces together: it runs a crawl to build the page
//! table and inverted index, saves and loads them through its storage, and
//! answers queries once an index is present.

use crate::config::Config;
use crate::crawler::{Coordinator, CrawlStats, ShutdownSignal};
use crate::index::{InvertedIndex, PageId, PageStore, Postings};
use crate::query::{rank, QueryEngine, ScoredPage};
use crate::storage::{IndexStorage, JsonStorage, StorageResult};
use crate::{QuarryError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Size figures of the current index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexStats {
    /// Registered URLs
    pub pages: usize,
    /// Distinct words
    pub words: usize,
    /// (word, page) pairs
    pub postings: usize,
}

/// Crawl, persist and query one site's index
pub struct Engine {
    config: Config,
    storage: Arc<dyn IndexStorage + Send + Sync>,
    shutdown: ShutdownSignal,
    pages: PageStore,
    index: InvertedIndex,
    loaded: bool,
}

impl Engine {
    /// Creates an engine persisting to the paths named in `config`
    pub fn new(config: Config) -> Self {
        let storage = JsonStorage::new(&config.output.index_path, &config.output.urls_path);
        Self::with_storage(config, Arc::new(storage))
    }

    /// Creates an engine over an explicit storage backend
    pub fn with_storage(config: Config, storage: Arc<dyn IndexStorage + Send + Sync>) -> Self {
        Self {
            config,
            storage,
            shutdown: Arc::new(AtomicBool::new(false)),
            pages: PageStore::new(),
            index: InvertedIndex::new(),
            loaded: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Flag that stops a running [`Engine::build_index`] when set
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        Arc::clone(&self.shutdown)
    }

    /// Crawls the site from `seed` and replaces the current stores
    ///
    /// The crawl starts from empty stores. When it ends, normally or through
    /// the shutdown signal, everything indexed so far becomes the engine's
    /// index. Per-page failures never end the crawl.
    ///
    /// The shutdown signal is cleared once the crawl ends, so a stop request
    /// only applies to the build it interrupted.
    pub async fn build_index(&mut self, seed: &str) -> Result<CrawlStats> {
        let mut coordinator = Coordinator::new(&self.config, self.shutdown_signal())?
            .with_checkpoints(
                self.config.crawler.checkpoint_interval,
                Arc::clone(&self.storage),
            );

        let outcome = coordinator.run(seed).await;
        self.shutdown.store(false, Ordering::SeqCst);
        let stats = outcome?;

        let (pages, index) = coordinator.into_stores();
        self.pages = pages;
        self.index = index;
        self.loaded = true;

        Ok(stats)
    }

    /// Writes the page table and index to storage
    pub fn save_index(&self) -> StorageResult<()> {
        self.storage.save(&self.pages, &self.index)?;
        tracing::info!(
            "Saved index: {} pages, {} words",
            self.pages.len(),
            self.index.word_count()
        );
        Ok(())
    }

    /// Replaces the current stores with the saved ones
    ///
    /// On error nothing changes: an engine that had no index still has none.
    pub fn load_index(&mut self) -> StorageResult<()> {
        let (pages, index) = self.storage.load()?;
        self.pages = pages;
        self.index = index;
        self.loaded = true;

        tracing::info!(
            "Loaded index: {} pages, {} words",
            self.pages.len(),
            self.index.word_count()
        );
        Ok(())
    }

    /// Returns true once an index has been built or loaded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn get_link_by_id(&self, page_id: PageId) -> Option<&str> {
        self.pages.url_of(page_id)
    }

    /// Returns the postings of a word, matched exactly
    pub fn get_word_index(&self, word: &str) -> Option<&Postings> {
        self.index.lookup(word)
    }

    /// Scores every page matching at least one query word
    ///
    /// The query is lowercased before scoring.
    pub fn find(&self, query: &str) -> Result<HashMap<PageId, u64>> {
        if !self.loaded {
            return Err(QuarryError::IndexNotLoaded);
        }
        let query = query.to_lowercase();
        Ok(QueryEngine::new(&self.index).find(&query))
    }

    /// Runs [`Engine::find`] and orders the hits best first
    pub fn search(&self, query: &str) -> Result<Vec<ScoredPage>> {
        Ok(rank(&self.find(query)?))
    }

    pub fn index_stats(&self) -> IndexStats {
        IndexStats {
            pages: self.pages.len(),
            words: self.index.word_count(),
            postings: self.index.posting_count(),
        }
    }

    pub fn pages(&self) -> &PageStore {
        &self.pages
    }
}
