use crate::url::normalize::strip_trailing_separator;

/// Checks whether a URL lies inside the crawl's base-URL prefix
///
/// Both sides are stripped of trailing separators before comparison, so
/// `https://example.com/` and `https://example.com` describe the same base.
/// The prefix must end on a path, query or fragment boundary: a base of
/// `https://example.com` does not admit `https://example.com.evil.net`.
///
/// # Arguments
///
/// * `candidate` - The URL to check
/// * `base` - The crawl's base URL
///
/// # Returns
///
/// * `true` - If the candidate is the base itself or lies under it
/// * `false` - Otherwise
///
/// # Examples
///
/// ```
/// use quarry::url::is_within_base;
///
/// assert!(is_within_base("https://example.com/page/2/", "https://example.com/"));
/// assert!(is_within_base("https://example.com", "https://example.com/"));
/// assert!(!is_within_base("https://other.com/page", "https://example.com"));
/// assert!(!is_within_base("https://example.com.evil.net/", "https://example.com"));
/// ```
pub fn is_within_base(candidate: &str, base: &str) -> bool {
    let candidate = strip_trailing_separator(candidate);
    let base = strip_trailing_separator(base);

    match candidate.strip_prefix(base) {
        Some("") => true,
        Some(rest) => rest.starts_with(['/', '?', '#']),
        None => false,
    }
}
