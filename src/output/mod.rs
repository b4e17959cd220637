//! Human-readable reports for the command line
//!
//! Every report is rendered to a `String` by a `format_*` function and
//! written to stdout by the matching `print_*` function.

pub mod results;
pub mod stats;

pub use results::{format_results, format_word_index, print_results, print_word_index};
pub use stats::{format_crawl_stats, format_index_stats, print_crawl_stats, print_index_stats};
