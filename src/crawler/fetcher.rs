//! HTTP fetching for the crawler
//!
//! Every response is classified into a [`FetchResult`]; nothing here returns
//! an error to the caller. Redirects are followed by the client, and each
//! request is bounded by the configured fetch timeout.

use crate::config::UserAgentConfig;
use crate::state::PageState;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Upper bound on connection establishment, independent of the fetch timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of fetching one URL
#[derive(Debug)]
pub enum FetchResult {
    /// An HTML page was retrieved
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
    },

    /// The server answered with a non-success status
    HttpError {
        status_code: u16,
        /// The page state this status maps to
        state: PageState,
    },

    /// The response is not HTML
    ContentMismatch {
        /// The Content-Type received (empty if absent)
        content_type: String,
    },

    /// No usable response: timeout, refused connection, TLS failure or a
    /// body that could not be read
    NetworkError {
        error: String,
        /// The page state this error maps to
        state: PageState,
    },
}

impl FetchResult {
    /// Page state recorded for this outcome
    pub fn page_state(&self) -> PageState {
        match self {
            FetchResult::Success { .. } => PageState::Indexed,
            FetchResult::HttpError { state, .. } | FetchResult::NetworkError { state, .. } => {
                *state
            }
            FetchResult::ContentMismatch { .. } => PageState::ContentMismatch,
        }
    }
}

/// Builds the crawler's HTTP client
///
/// The user agent reads `Name/Version (+ContactURL; ContactEmail)`.
///
/// # Example
///
/// ```
/// use quarry::config::UserAgentConfig;
/// use quarry::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "Quarry".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/bot".to_string(),
///     contact_email: "bot@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    fetch_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(fetch_timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(fetch_timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the response
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with `text/html` | `Success` |
/// | 2xx, other or missing Content-Type | `ContentMismatch` |
/// | 404 / 410 | `HttpError` → `DeadLink` |
/// | other status | `HttpError` → `Failed` |
/// | timeout, connect or TLS failure | `NetworkError` → `Unreachable` |
/// | anything else | `NetworkError` → `Failed` |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        let state = match status {
            StatusCode::NOT_FOUND | StatusCode::GONE => PageState::DeadLink,
            _ => PageState::Failed,
        };
        return FetchResult::HttpError {
            status_code: status.as_u16(),
            state,
        };
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => classify_error(&e),
    }
}

/// Returns true for `text/html` and `application/xhtml+xml` media types
fn is_html(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    media_type == "text/html" || media_type == "application/xhtml+xml"
}

/// Maps a transport error to a network failure
fn classify_error(error: &reqwest::Error) -> FetchResult {
    if error.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            state: PageState::Unreachable,
        }
    } else if error.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", error),
            state: PageState::Unreachable,
        }
    } else {
        FetchResult::NetworkError {
            error: error.to_string(),
            state: PageState::Failed,
        }
    }
}
