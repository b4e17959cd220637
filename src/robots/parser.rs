//! robots.txt rules for a single origin
//!
//! Allow/Disallow matching is delegated to the `robotstxt` crate. The crate
//! has no notion of `Crawl-delay`, so that directive is read here.

use robotstxt::DefaultMatcher;

/// robots.txt rules of the crawled site
#[derive(Debug, Clone, Default)]
pub struct ParsedRobots {
    /// Raw robots.txt body; `None` permits everything
    content: Option<String>,
}

impl ParsedRobots {
    /// Wraps a robots.txt body
    pub fn from_content(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
        }
    }

    /// Rules that permit every URL
    ///
    /// Used when the site serves no robots.txt or it cannot be fetched.
    pub fn allow_all() -> Self {
        Self { content: None }
    }

    /// Returns true when `agent` may fetch `url`
    ///
    /// `agent` is the product token of the user agent (e.g. `Quarry`), and
    /// `url` is an absolute URL.
    pub fn is_allowed(&self, url: &str, agent: &str) -> bool {
        match self.content.as_deref() {
            None | Some("") => true,
            Some(content) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, agent, url)
            }
        }
    }

    /// Crawl-delay in seconds that applies to `agent`
    ///
    /// A group naming the agent wins over the `*` group.
    pub fn crawl_delay(&self, agent: &str) -> Option<f64> {
        let content = self.content.as_deref()?;
        let agent = agent.to_lowercase();

        let mut group: Vec<String> = Vec::new();
        let mut group_open = false;
        let mut specific = None;
        let mut wildcard = None;

        for line in content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_lowercase().as_str() {
                "user-agent" => {
                    // consecutive user-agent lines share one group
                    if !group_open {
                        group.clear();
                        group_open = true;
                    }
                    group.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    group_open = false;
                    let Ok(delay) = value.parse::<f64>() else {
                        continue;
                    };
                    if group.iter().any(|name| *name == agent) {
                        specific = Some(delay);
                    } else if group.iter().any(|name| name == "*") {
                        wildcard = Some(delay);
                    }
                }
                _ => group_open = false,
            }
        }

        specific.or(wildcard)
    }
}
