//! Query results and word postings

use crate::index::{PageStore, Postings};
use crate::query::ScoredPage;
use std::fmt::Write;

/// Renders ranked hits as `rank. score  url`, at most `limit` of them
pub fn format_results(
    query: &str,
    hits: &[ScoredPage],
    pages: &PageStore,
    limit: usize,
) -> String {
    let mut out = String::new();

    if hits.is_empty() {
        let _ = writeln!(out, "No results for \"{}\"", query);
        return out;
    }

    let _ = writeln!(out, "=== Results for \"{}\" ===\n", query);
    for (rank, hit) in hits.iter().take(limit).enumerate() {
        let url = pages.url_of(hit.page_id).unwrap_or("<unknown page>");
        let _ = writeln!(out, "{:>3}. {:>6}  {}", rank + 1, hit.score, url);
    }

    if hits.len() > limit {
        let _ = writeln!(out, "\n... and {} more", hits.len() - limit);
    }

    out
}

/// Renders the pages, positions and frequency of one word
pub fn format_word_index(word: &str, postings: Option<&Postings>, pages: &PageStore) -> String {
    let mut out = String::new();

    let Some(postings) = postings else {
        let _ = writeln!(out, "\"{}\" is not in the index", word);
        return out;
    };

    let total: usize = postings.values().map(Vec::len).sum();
    let _ = writeln!(
        out,
        "=== \"{}\": {} occurrences on {} pages ===\n",
        word,
        total,
        postings.len()
    );

    for (page_id, positions) in postings {
        let url = pages.url_of(*page_id).unwrap_or("<unknown page>");
        let _ = writeln!(out, "{}", url);
        let _ = writeln!(
            out,
            "  frequency: {}, positions: {:?}",
            positions.len(),
            positions
        );
    }

    out
}

pub fn print_results(query: &str, hits: &[ScoredPage], pages: &PageStore, limit: usize) {
    print!("{}", format_results(query, hits, pages, limit));
}

pub fn print_word_index(word: &str, postings: Option<&Postings>, pages: &PageStore) {
    print!("{}", format_word_index(word, postings, pages));
}
