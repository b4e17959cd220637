//! Query scoring over a built or loaded index
//!
//! Scores are additive:
//! - every occurrence of a query word on a page adds 1 (term frequency)
//! - for multi-word queries, a page matching `m > 1` distinct query words
//!   gains `5 * m`
//! - a page matching every query word gains 100 for each position where the
//!   words appear contiguously and in query order

use crate::index::{InvertedIndex, PageId, Postings};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// Bonus per distinct matched word when more than one word matches
pub const CO_OCCURRENCE_BONUS: u64 = 5;

/// Bonus per exact, in-order occurrence of the whole query
pub const PHRASE_BONUS: u64 = 100;

/// A page together with its final score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredPage {
    pub page_id: PageId,
    pub score: u64,
}

/// Read-only scorer over an inverted index
pub struct QueryEngine<'a> {
    index: &'a InvertedIndex,
}

impl<'a> QueryEngine<'a> {
    /// Creates a query engine borrowing an index
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self { index }
    }

    /// Scores every page that contains at least one query word
    ///
    /// The query is split on whitespace and used as-is; callers lowercase it
    /// first. Words missing from the index are skipped and logged.
    ///
    /// # Examples
    ///
    /// ```
    /// use quarry::{tokenize, InvertedIndex, QueryEngine};
    ///
    /// let mut index = InvertedIndex::new();
    /// index.record(0, &tokenize("the cat sat on the mat")).unwrap();
    ///
    /// let scores = QueryEngine::new(&index).find("the");
    /// assert_eq!(scores.get(&0), Some(&2));
    /// ```
    pub fn find(&self, query: &str) -> HashMap<PageId, u64> {
        let words: Vec<&str> = query.split_whitespace().collect();
        let mut scores: HashMap<PageId, u64> = HashMap::new();

        let mut known: Vec<(&str, &Postings)> = Vec::with_capacity(words.len());
        for word in &words {
            match self.index.lookup(word) {
                Some(postings) => known.push((*word, postings)),
                None => tracing::info!("Word '{}' not found in index, skipping", word),
            }
        }

        for (_, postings) in &known {
            for (page_id, positions) in postings.iter() {
                *scores.entry(*page_id).or_insert(0) += positions.len() as u64;
            }
        }

        if words.len() > 1 {
            let distinct: HashMap<&str, &Postings> = known.iter().copied().collect();

            for (page_id, score) in scores.iter_mut() {
                let matched = distinct
                    .values()
                    .filter(|postings| postings.contains_key(page_id))
                    .count();

                if matched > 1 {
                    *score += matched as u64 * CO_OCCURRENCE_BONUS;
                }

                if matched == words.len() {
                    *score += PHRASE_BONUS * self.phrase_matches(&words, *page_id);
                }
            }
        }

        scores
    }

    /// Counts the start positions at which all words occur contiguously on a page
    fn phrase_matches(&self, words: &[&str], page_id: PageId) -> u64 {
        let mut chain = Vec::with_capacity(words.len());
        for word in words {
            match self
                .index
                .lookup(word)
                .and_then(|postings| postings.get(&page_id))
            {
                Some(positions) => chain.push(positions.iter().copied().collect::<HashSet<_>>()),
                None => return 0,
            }
        }

        let Some((first, rest)) = chain.split_first() else {
            return 0;
        };

        first
            .iter()
            .filter(|&&start| {
                rest.iter().enumerate().all(|(offset, positions)| {
                    start
                        .checked_add(offset as u32 + 1)
                        .is_some_and(|next| positions.contains(&next))
                })
            })
            .count() as u64
    }
}

/// Orders scores best first, breaking ties by ascending page id
///
/// # Examples
///
/// ```
/// use quarry::query::rank;
/// use std::collections::HashMap;
///
/// let scores = HashMap::from([(2, 5), (0, 9), (1, 5)]);
/// let order: Vec<u32> = rank(&scores).iter().map(|hit| hit.page_id).collect();
/// assert_eq!(order, vec![0, 1, 2]);
/// ```
pub fn rank(scores: &HashMap<PageId, u64>) -> Vec<ScoredPage> {
    let mut ranked: Vec<ScoredPage> = scores
        .iter()
        .map(|(&page_id, &score)| ScoredPage { page_id, score })
        .collect();
    ranked.sort_by_key(|hit| (Reverse(hit.score), hit.page_id));
    ranked
}
