//! Quarry: a polite single-site search indexer
//!
//! This crate crawls one website breadth-first from a seed URL and builds a
//! positional inverted index of the visible page text. The index is saved as
//! JSON and answers multi-word queries, ranking pages higher when the query
//! words appear together and in order.

pub mod config;
pub mod crawler;
pub mod engine;
pub mod index;
pub mod output;
pub mod query;
pub mod robots;
pub mod state;
pub mod storage;
pub mod tokenizer;
pub mod url;

use thiserror::Error;

/// Main error type for Quarry operations
#[derive(Debug, Error)]
pub enum QuarryError {
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Index not loaded")]
    IndexNotLoaded,

    #[error("Seed URL {seed} lies outside base URL {base}")]
    SeedOutsideBase { seed: String, base: String },

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Quarry operations
pub type Result<T> = std::result::Result<T, QuarryError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use engine::Engine;
pub use index::{InvertedIndex, PageId, PageStore, Position};
pub use query::{QueryEngine, ScoredPage};
pub use state::{CrawlPhase, PageState};
pub use tokenizer::tokenize;
pub use url::{is_within_base, normalize_url};
