//! Persistence of the page table and inverted index
//!
//! Two JSON artifacts are written side by side:
//! - the index, `{ word: { "<page_id>": [positions...] } }`
//! - the URL table, `{ "<page_id>": url }`
//!
//! Page ids are JSON object keys and therefore strings on disk.

mod json;
mod traits;

pub use json::JsonStorage;
pub use traits::{IndexStorage, StorageError, StorageResult};
