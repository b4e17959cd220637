//! Crawler module for single-site crawling
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with response classification
//! - HTML parsing for text and link extraction
//! - The breadth-first frontier and politeness pacing
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod stats;

pub use coordinator::{Coordinator, ShutdownSignal};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use frontier::{effective_delay, Frontier, Politeness};
pub use parser::{parse_html, ParsedPage};
pub use stats::CrawlStats;
