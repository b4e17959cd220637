//! Crawl and index statistics

use crate::crawler::CrawlStats;
use crate::engine::IndexStats;
use crate::state::PageState;
use std::fmt::Write;

/// Renders a crawl summary with per-state counts
pub fn format_crawl_stats(stats: &CrawlStats) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Statistics ===\n");
    let _ = writeln!(
        out,
        "Started:  {}",
        stats.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    match stats.finished_at {
        Some(finished) => {
            let _ = writeln!(out, "Finished: {}", finished.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        None => {
            let _ = writeln!(out, "Finished: (running)");
        }
    }
    let _ = writeln!(
        out,
        "Duration: {}s{}",
        stats.elapsed().as_secs(),
        if stats.interrupted { " (stopped early)" } else { "" }
    );
    let _ = writeln!(out);

    let processed = stats.processed();
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Pages processed: {}", processed);
    let _ = writeln!(out, "  Fetches: {}", stats.fetches);
    let _ = writeln!(out, "  Links discovered: {}", stats.links_discovered);
    let _ = writeln!(out, "  Rate: {:.2} pages/sec", stats.rate());
    let _ = writeln!(out);

    let _ = writeln!(out, "Pages by State:");
    for state in PageState::all_states() {
        let count = stats.count(state);
        if count == 0 {
            continue;
        }
        let percentage = count as f64 / processed as f64 * 100.0;
        let _ = writeln!(out, "  {}: {} ({:.1}%)", state, count, percentage);
    }
    let _ = writeln!(out);

    let success_rate = if processed > 0 {
        stats.indexed() as f64 / processed as f64 * 100.0
    } else {
        0.0
    };
    let _ = writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} pages indexed)",
        success_rate,
        stats.indexed(),
        processed
    );

    out
}

/// Renders the size of an index
pub fn format_index_stats(stats: &IndexStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Index Statistics ===\n");
    let _ = writeln!(out, "  Pages: {}", stats.pages);
    let _ = writeln!(out, "  Distinct words: {}", stats.words);
    let _ = writeln!(out, "  Postings: {}", stats.postings);
    out
}

pub fn print_crawl_stats(stats: &CrawlStats) {
    print!("{}", format_crawl_stats(stats));
}

pub fn print_index_stats(stats: &IndexStats) {
    print!("{}", format_index_stats(stats));
}
