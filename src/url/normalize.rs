use crate::UrlError;
use url::Url;

/// Strips every trailing path separator from a URL string
///
/// This is the identity rule for pages: two URLs that differ only by a
/// trailing `/` are the same page.
///
/// # Examples
///
/// ```
/// use quarry::url::strip_trailing_separator;
///
/// assert_eq!(strip_trailing_separator("https://example.com/page/"), "https://example.com/page");
/// assert_eq!(strip_trailing_separator("https://example.com/"), "https://example.com");
/// ```
pub fn strip_trailing_separator(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// Normalizes a URL according to Quarry's normalization rules
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace and parse; reject if malformed
/// 2. Reject anything that is not HTTP or HTTPS, or has no host
/// 3. Remove fragment (everything after #)
/// 4. Serialize (the parser lowercases the host and resolves dot segments)
/// 5. Strip trailing path separators
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(String)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use quarry::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.com/a/../page/#top").unwrap();
/// assert_eq!(url, "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<String, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(strip_trailing_separator(url.as_str()).to_string())
}
