//! Configuration module for Quarry
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use quarry::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("quarry.toml")).unwrap();
//! println!("Crawler will stay under: {}", config.crawler.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
