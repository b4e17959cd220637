use crate::index::{IndexError, IndexResult, PageId, Position};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Positions of one word, keyed by the page it occurs on
pub type Postings = BTreeMap<PageId, Vec<Position>>;

/// Positional inverted index: word → page → ordered token positions
///
/// Each page is recorded in a single pass over its full token sequence, so
/// every position list is strictly increasing. Recording the same page a
/// second time is refused rather than interleaving duplicate positions.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    entries: HashMap<String, Postings>,
    recorded: HashSet<PageId>,
}

impl InvertedIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the complete token sequence of one page
    ///
    /// The index of each token in `tokens` becomes its position.
    ///
    /// # Errors
    ///
    /// * `IndexError::AlreadyRecorded` - The page was recorded before; the
    ///   index is left untouched
    /// * `IndexError::TooManyTokens` - The page has more tokens than a
    ///   [`Position`] can address
    ///
    /// # Examples
    ///
    /// ```
    /// use quarry::InvertedIndex;
    ///
    /// let mut index = InvertedIndex::new();
    /// let tokens = ["the", "cat", "sat", "on", "the", "mat"].map(String::from);
    /// index.record(0, &tokens).unwrap();
    ///
    /// assert_eq!(index.lookup("the").unwrap()[&0], vec![0, 4]);
    /// assert!(index.record(0, &tokens).is_err());
    /// ```
    pub fn record(&mut self, page_id: PageId, tokens: &[String]) -> IndexResult<()> {
        if self.recorded.contains(&page_id) {
            return Err(IndexError::AlreadyRecorded(page_id));
        }
        if Position::try_from(tokens.len()).is_err() {
            return Err(IndexError::TooManyTokens(page_id));
        }

        self.recorded.insert(page_id);
        for (position, token) in tokens.iter().enumerate() {
            self.entries
                .entry(token.clone())
                .or_default()
                .entry(page_id)
                .or_default()
                .push(position as Position);
        }

        Ok(())
    }

    /// Returns every page a word occurs on, with its positions
    pub fn lookup(&self, word: &str) -> Option<&Postings> {
        self.entries.get(word)
    }

    /// Returns whether a page has been recorded
    pub fn contains_page(&self, page_id: PageId) -> bool {
        self.recorded.contains(&page_id)
    }

    /// Number of distinct words
    pub fn word_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of recorded pages
    pub fn page_count(&self) -> usize {
        self.recorded.len()
    }

    /// Total number of (word, page) entries
    pub fn posting_count(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// Returns whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.recorded.is_empty()
    }

    /// Exports the word → postings mapping ordered by word
    pub fn to_entries(&self) -> BTreeMap<&str, &Postings> {
        self.entries
            .iter()
            .map(|(word, postings)| (word.as_str(), postings))
            .collect()
    }

    /// Rebuilds an index from a persisted word → postings mapping
    ///
    /// Every position list must be non-empty and strictly increasing.
    pub fn from_entries(entries: HashMap<String, Postings>) -> IndexResult<Self> {
        let mut recorded = HashSet::new();

        for (word, postings) in &entries {
            for (page_id, positions) in postings {
                if positions.is_empty() {
                    return Err(IndexError::Corrupt(format!(
                        "word '{}' has an empty position list on page {}",
                        word, page_id
                    )));
                }
                if positions.windows(2).any(|pair| pair[0] >= pair[1]) {
                    return Err(IndexError::Corrupt(format!(
                        "positions of '{}' on page {} are not strictly increasing",
                        word, page_id
                    )));
                }
                recorded.insert(*page_id);
            }
        }

        Ok(Self { entries, recorded })
    }

    /// Iterates over every page id referenced by a posting
    pub fn page_ids(&self) -> impl Iterator<Item = PageId> + '_ {
        self.recorded.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_record_positions() {
        let mut index = InvertedIndex::new();
        index
            .record(0, &words(&["the", "cat", "sat", "on", "the", "mat"]))
            .unwrap();

        assert_eq!(index.lookup("the").unwrap()[&0], vec![0, 4]);
        assert_eq!(index.lookup("mat").unwrap()[&0], vec![5]);
        assert_eq!(index.word_count(), 5);
        assert_eq!(index.page_count(), 1);
    }

    #[test]
    fn test_multiple_pages() {
        let mut index = InvertedIndex::new();
        index.record(0, &words(&["love", "is", "blind"])).unwrap();
        index.record(1, &words(&["blind", "love"])).unwrap();

        let love = index.lookup("love").unwrap();
        assert_eq!(love[&0], vec![0]);
        assert_eq!(love[&1], vec![1]);
        assert_eq!(index.posting_count(), 5);
    }

    #[test]
    fn test_lookup_miss() {
        let index = InvertedIndex::new();
        assert!(index.lookup("zzznotaword").is_none());
    }

    #[test]
    fn test_second_record_is_refused() {
        let mut index = InvertedIndex::new();
        index.record(3, &words(&["a", "b", "a"])).unwrap();

        let err = index.record(3, &words(&["a"])).unwrap_err();
        assert!(matches!(err, IndexError::AlreadyRecorded(3)));
        assert_eq!(index.lookup("a").unwrap()[&3], vec![0, 2]);
    }

    #[test]
    fn test_empty_page_is_still_recorded() {
        let mut index = InvertedIndex::new();
        index.record(0, &[]).unwrap();
        assert!(index.contains_page(0));
        assert_eq!(index.word_count(), 0);
    }

    #[test]
    fn test_positions_strictly_increasing() {
        let mut index = InvertedIndex::new();
        let text = "a rose is a rose is a rose, said the rose";
        index.record(0, &tokenize(text)).unwrap();
        index.record(1, &tokenize("rose rose rose")).unwrap();

        for (_, postings) in index.to_entries() {
            for positions in postings.values() {
                assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
            }
        }
    }

    #[test]
    fn test_entries_round_trip() {
        let mut index = InvertedIndex::new();
        index.record(0, &words(&["x", "y", "x"])).unwrap();
        index.record(1, &words(&["y"])).unwrap();

        let exported: HashMap<String, Postings> = index
            .to_entries()
            .into_iter()
            .map(|(word, postings)| (word.to_string(), postings.clone()))
            .collect();
        let restored = InvertedIndex::from_entries(exported).unwrap();

        assert_eq!(restored.lookup("x").unwrap()[&0], vec![0, 2]);
        assert_eq!(restored.lookup("y").unwrap()[&1], vec![0]);
        assert!(restored.contains_page(1));
    }

    #[test]
    fn test_from_entries_rejects_unordered_positions() {
        let mut postings = Postings::new();
        postings.insert(0, vec![3, 1]);
        let mut entries = HashMap::new();
        entries.insert("word".to_string(), postings);

        assert!(matches!(
            InvertedIndex::from_entries(entries),
            Err(IndexError::Corrupt(_))
        ));
    }

    #[test]
    fn test_from_entries_rejects_empty_positions() {
        let mut postings = Postings::new();
        postings.insert(0, vec![]);
        let mut entries = HashMap::new();
        entries.insert("word".to_string(), postings);

        assert!(InvertedIndex::from_entries(entries).is_err());
    }
}
