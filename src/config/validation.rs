use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::url::is_within_base;
use crate::ConfigError;
use url::Url;

/// Shortest accepted pause between fetches, in milliseconds
const MIN_POLITENESS_DELAY_MS: u64 = 100;

/// Shortest accepted fetch timeout, in milliseconds
const MIN_FETCH_TIMEOUT_MS: u64 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;

    if let Some(seed) = &config.seed_url {
        validate_http_url("seed-url", seed)?;

        if !is_within_base(seed, &config.base_url) {
            return Err(ConfigError::Validation(format!(
                "seed-url '{}' must lie under base-url '{}'",
                seed, config.base_url
            )));
        }
    }

    if config.politeness_delay < MIN_POLITENESS_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "politeness-delay must be >= {}ms, got {}ms",
            MIN_POLITENESS_DELAY_MS, config.politeness_delay
        )));
    }

    if config.fetch_timeout < MIN_FETCH_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "fetch-timeout must be >= {}ms, got {}ms",
            MIN_FETCH_TIMEOUT_MS, config.fetch_timeout
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Checks that a URL parses, uses HTTP(S) and names a host
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use HTTP or HTTPS",
            field, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            field, value
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.index_path.is_empty() {
        return Err(ConfigError::Validation(
            "index-path cannot be empty".to_string(),
        ));
    }

    if config.urls_path.is_empty() {
        return Err(ConfigError::Validation(
            "urls-path cannot be empty".to_string(),
        ));
    }

    if config.index_path == config.urls_path {
        return Err(ConfigError::Validation(format!(
            "index-path and urls-path must differ, both are '{}'",
            config.index_path
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid contact-email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid contact-email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid contact-email domain: '{}'",
            email
        )));
    }

    Ok(())
}
