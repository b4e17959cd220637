//! robots.txt fetching and matching
//!
//! The crawler reads the robots.txt of its base origin once, before the first
//! page fetch, and consults it for every URL it dequeues.

mod parser;

pub use parser::ParsedRobots;

use crate::url::robots_url;
use reqwest::Client;

/// Fetches and parses the robots.txt governing `base_url`
///
/// Any failure, including a non-success status or a network error, yields
/// [`ParsedRobots::allow_all`]; the crawl never stops because of robots.txt.
pub async fn fetch_robots(client: &Client, base_url: &str) -> ParsedRobots {
    let url = match robots_url(base_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot derive robots.txt URL from {}: {}", base_url, e);
            return ParsedRobots::allow_all();
        }
    };

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}, allowing all", url, e);
            return ParsedRobots::allow_all();
        }
    };

    if !response.status().is_success() {
        tracing::info!("{} returned {}, allowing all", url, response.status());
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => {
            tracing::debug!("Loaded robots.txt from {} ({} bytes)", url, body.len());
            ParsedRobots::from_content(&body)
        }
        Err(e) => {
            tracing::warn!("Failed to read {}: {}, allowing all", url, e);
            ParsedRobots::allow_all()
        }
    }
}
