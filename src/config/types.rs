use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Quarry
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Every crawled URL must lie under this prefix
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// First URL to fetch; defaults to the base URL
    #[serde(rename = "seed-url", default)]
    pub seed_url: Option<String>,

    /// Pause between two successive fetches (milliseconds)
    #[serde(rename = "politeness-delay")]
    pub politeness_delay: u64,

    /// Upper bound on a single fetch (milliseconds)
    #[serde(rename = "fetch-timeout", default = "default_fetch_timeout")]
    pub fetch_timeout: u64,

    /// Save the index after this many indexed pages (0 disables checkpoints)
    #[serde(rename = "checkpoint-interval", default)]
    pub checkpoint_interval: u32,

    /// Stop after this many fetch attempts
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,

    /// Fetch robots.txt once and skip disallowed pages
    #[serde(rename = "respect-robots", default = "default_respect_robots")]
    pub respect_robots: bool,
}

fn default_fetch_timeout() -> u64 {
    30_000
}

fn default_respect_robots() -> bool {
    true
}

impl CrawlerConfig {
    /// The URL the crawl starts from
    pub fn seed(&self) -> &str {
        self.seed_url.as_deref().unwrap_or(&self.base_url)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the word index artifact
    #[serde(rename = "index-path")]
    pub index_path: String,

    /// Path to the URL table artifact
    #[serde(rename = "urls-path")]
    pub urls_path: String,
}
