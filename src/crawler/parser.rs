//! HTML parsing for indexing and link discovery
//!
//! A fetched page yields three things:
//! - its title (from `<title>`)
//! - its document text: every text node outside `script`, `style`,
//!   `noscript` and `template`, joined with single spaces
//! - the absolute targets of its `<a href>` links

use scraper::{Html, Node, Selector};
use url::Url;

/// Elements whose text is never part of the document text
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Link schemes that never lead to a crawlable page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// The page title, when present and non-blank
    pub title: Option<String>,

    /// Document text ready for tokenization
    pub text: String,

    /// Absolute http(s) link targets, fragment removed, in document order
    pub links: Vec<String>,
}

/// Parses an HTML document fetched from `page_url`
///
/// Relative links resolve against `page_url`. Parsing is lenient; malformed
/// markup produces whatever text and links the HTML5 parser recovers.
///
/// # Example
///
/// ```
/// use quarry::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Quotes</title></head>
///     <body><p>Be yourself</p><a href="/page/2/">Next</a></body></html>"#;
/// let page_url = Url::parse("https://quotes.toscrape.com/").unwrap();
/// let parsed = parse_html(html, &page_url);
///
/// assert_eq!(parsed.title.as_deref(), Some("Quotes"));
/// assert_eq!(parsed.text, "Quotes Be yourself Next");
/// assert_eq!(parsed.links, vec!["https://quotes.toscrape.com/page/2/"]);
/// ```
pub fn parse_html(html: &str, page_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        text: extract_text(&document),
        links: extract_links(&document, page_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Joins all visible text nodes with single spaces
fn extract_text(document: &Html) -> String {
    let mut fragments: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let fragment = text.trim();
        if !fragment.is_empty() {
            fragments.push(fragment);
        }
    }

    fragments.join(" ")
}

/// Collects the resolvable link targets of `<a href>` elements
fn extract_links(document: &Html, page_url: &Url) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, page_url))
        .collect()
}

/// Resolves an href to an absolute http(s) URL without fragment
///
/// Returns None for empty, fragment-only and non-page hrefs, and for anything
/// that does not resolve.
fn resolve_link(href: &str, page_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let mut absolute = page_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);

    Some(absolute.to_string())
}
