//! In-memory index structures
//!
//! This module owns the two stores a crawl produces and a query reads:
//! - [`PageStore`]: the bidirectional URL ↔ [`PageId`] table
//! - [`InvertedIndex`]: word → page → ordered token positions

mod inverted;
mod page_store;

pub use inverted::{InvertedIndex, Postings};
pub use page_store::PageStore;

use thiserror::Error;

/// Stable identifier of a crawled page, assigned from 0 upwards
pub type PageId = u32;

/// Zero-based index of a token within a page's token sequence
pub type Position = u32;

/// Errors raised when an index structure would lose its invariants
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Page {0} has already been recorded")]
    AlreadyRecorded(PageId),

    #[error("Page {0} has more tokens than a position can address")]
    TooManyTokens(PageId),

    #[error("Corrupt index data: {0}")]
    Corrupt(String),
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;
