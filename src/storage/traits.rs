//! Storage traits and error types

use crate::index::{IndexError, InvertedIndex, PageStore};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting or restoring an index
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt artifact: {0}")]
    Corrupt(String),
}

impl From<IndexError> for StorageError {
    fn from(error: IndexError) -> Self {
        StorageError::Corrupt(error.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A place the page table and inverted index can be saved to and loaded from
///
/// Loading either succeeds with both stores or changes nothing.
pub trait IndexStorage {
    /// Persists both stores
    fn save(&self, pages: &PageStore, index: &InvertedIndex) -> StorageResult<()>;

    /// Restores both stores
    ///
    /// A missing artifact is reported as [`StorageError::NotFound`].
    fn load(&self) -> StorageResult<(PageStore, InvertedIndex)>;
}
