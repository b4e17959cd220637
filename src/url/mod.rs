//! URL handling module for Quarry
//!
//! This module provides URL normalization and the base-URL scope check used
//! to keep a crawl on a single site.

mod matcher;
mod normalize;

use crate::{UrlError, UrlResult};
use ::url::Url;

// Re-export main functions
pub use matcher::is_within_base;
pub use normalize::{normalize_url, strip_trailing_separator};

/// Builds the robots.txt location for the origin of a URL
///
/// # Examples
///
/// ```
/// use quarry::url::robots_url;
///
/// let robots = robots_url("https://quotes.toscrape.com/page/2").unwrap();
/// assert_eq!(robots, "https://quotes.toscrape.com/robots.txt");
/// ```
pub fn robots_url(url: &str) -> UrlResult<String> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(e.to_string()))?;
    let robots = parsed
        .join("/robots.txt")
        .map_err(|e| UrlError::Parse(e.to_string()))?;
    Ok(robots.to_string())
}
