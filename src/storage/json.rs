use crate::index::{InvertedIndex, PageId, PageStore, Postings};
use crate::storage::{IndexStorage, StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// JSON file storage for the index and URL table
#[derive(Debug, Clone)]
pub struct JsonStorage {
    index_path: PathBuf,
    urls_path: PathBuf,
}

impl JsonStorage {
    /// Creates a storage writing the index and URL table to the given files
    pub fn new(index_path: impl Into<PathBuf>, urls_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            urls_path: urls_path.into(),
        }
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn urls_path(&self) -> &Path {
        &self.urls_path
    }
}

impl IndexStorage for JsonStorage {
    fn save(&self, pages: &PageStore, index: &InvertedIndex) -> StorageResult<()> {
        write_json(&self.index_path, &index.to_entries())?;
        write_json(&self.urls_path, &pages.to_url_table())?;

        tracing::debug!(
            "Saved {} words to {} and {} URLs to {}",
            index.word_count(),
            self.index_path.display(),
            pages.len(),
            self.urls_path.display()
        );
        Ok(())
    }

    fn load(&self) -> StorageResult<(PageStore, InvertedIndex)> {
        let entries: HashMap<String, Postings> = read_json(&self.index_path)?;
        let table: BTreeMap<PageId, String> = read_json(&self.urls_path)?;

        let pages = PageStore::from_url_table(table)?;
        let index = InvertedIndex::from_entries(entries)?;

        if let Some(orphan) = index.page_ids().find(|&id| pages.url_of(id).is_none()) {
            return Err(StorageError::Corrupt(format!(
                "index references page {} which has no URL",
                orphan
            )));
        }

        tracing::debug!(
            "Loaded {} words and {} URLs",
            index.word_count(),
            pages.len()
        );
        Ok((pages, index))
    }
}

/// Serializes `value` to a sibling temp file, then renames it over `path`
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path_for(path);
    let file = File::create(&tmp_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    drop(writer);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<T> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(StorageError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
