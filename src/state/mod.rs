//! State tracking module
//!
//! This module defines the lifecycle of a crawl and the outcome recorded for
//! each page it processes.

mod crawl_phase;
mod page_state;

pub use crawl_phase::CrawlPhase;
pub use page_state::PageState;
