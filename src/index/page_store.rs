use crate::index::{IndexError, IndexResult, PageId};
use crate::url::strip_trailing_separator;
use std::collections::{BTreeMap, HashMap};

/// Bidirectional mapping between page URLs and their ids
///
/// Ids are handed out from 0 in registration order and double as indexes
/// into the URL arena, so `PageId → URL` is total over every assigned id.
/// URLs are keyed without trailing separators.
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    urls: Vec<String>,
    ids: HashMap<String, PageId>,
}

impl PageStore {
    /// Creates an empty page store
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a URL and returns its id
    ///
    /// Registering the same URL again (with or without a trailing `/`)
    /// returns the id assigned the first time.
    ///
    /// # Examples
    ///
    /// ```
    /// use quarry::PageStore;
    ///
    /// let mut pages = PageStore::new();
    /// let first = pages.register_url("https://example.com/a/");
    /// let again = pages.register_url("https://example.com/a");
    /// assert_eq!(first, again);
    /// assert_eq!(pages.url_of(first), Some("https://example.com/a"));
    /// ```
    pub fn register_url(&mut self, url: &str) -> PageId {
        let key = strip_trailing_separator(url);
        if let Some(&id) = self.ids.get(key) {
            return id;
        }

        let id = self.urls.len() as PageId;
        self.urls.push(key.to_string());
        self.ids.insert(key.to_string(), id);
        id
    }

    /// Returns the URL registered under an id
    pub fn url_of(&self, id: PageId) -> Option<&str> {
        self.urls.get(id as usize).map(String::as_str)
    }

    /// Returns the id of a registered URL
    pub fn id_of(&self, url: &str) -> Option<PageId> {
        self.ids.get(strip_trailing_separator(url)).copied()
    }

    /// Number of registered pages
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns whether no page has been registered
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Iterates over `(id, url)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (PageId, &str)> + '_ {
        self.urls
            .iter()
            .enumerate()
            .map(|(id, url)| (id as PageId, url.as_str()))
    }

    /// Exports the id → URL table in its persisted shape
    pub fn to_url_table(&self) -> BTreeMap<PageId, String> {
        self.iter().map(|(id, url)| (id, url.to_string())).collect()
    }

    /// Rebuilds a page store from a persisted id → URL table
    ///
    /// The table must cover exactly the ids `0..n` and map each to a
    /// distinct URL, which is what [`PageStore::register_url`] produces.
    pub fn from_url_table(table: BTreeMap<PageId, String>) -> IndexResult<Self> {
        let mut store = Self::new();

        for (expected, (id, url)) in table.into_iter().enumerate() {
            if id as usize != expected {
                return Err(IndexError::Corrupt(format!(
                    "URL table skips page id {} (next entry is {})",
                    expected, id
                )));
            }

            let key = strip_trailing_separator(&url).to_string();
            if store.ids.insert(key.clone(), id).is_some() {
                return Err(IndexError::Corrupt(format!(
                    "URL {} is registered under more than one id",
                    key
                )));
            }
            store.urls.push(key);
        }

        Ok(store)
    }
}
