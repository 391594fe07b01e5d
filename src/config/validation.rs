use crate::config::types::{Config, CrawlParams, CrawlerConfig, ExtractConfig, HttpConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

pub const MIN_DEPTH: u32 = 1;
pub const MAX_DEPTH: u32 = 5;
pub const MIN_PAGES: usize = 1;
pub const MAX_PAGES: usize = 200;
pub const MIN_RATE_LIMIT: f64 = 0.1;
pub const MAX_RATE_LIMIT: f64 = 10.0;
pub const MIN_CONCURRENCY: usize = 1;
pub const MAX_CONCURRENCY: usize = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_extract_config(&config.extract)?;
    Ok(())
}

impl CrawlParams {
    /// Clamps every limit into its supported range
    ///
    /// Non-finite rates fall back to the slowest allowed rate.
    pub fn clamped(self) -> Self {
        let rate_limit = if self.rate_limit.is_finite() {
            self.rate_limit.clamp(MIN_RATE_LIMIT, MAX_RATE_LIMIT)
        } else {
            MIN_RATE_LIMIT
        };

        Self {
            max_depth: self.max_depth.clamp(MIN_DEPTH, MAX_DEPTH),
            max_pages: self.max_pages.clamp(MIN_PAGES, MAX_PAGES),
            rate_limit,
        }
    }
}

/// Clamps a bulk extraction concurrency bound into its supported range
pub fn clamp_concurrency(concurrency: usize) -> usize {
    concurrency.clamp(MIN_CONCURRENCY, MAX_CONCURRENCY)
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth < MIN_DEPTH || config.max_depth > MAX_DEPTH {
        return Err(ConfigError::Validation(format!(
            "max_depth must be between {} and {}, got {}",
            MIN_DEPTH, MAX_DEPTH, config.max_depth
        )));
    }

    if config.max_pages < MIN_PAGES || config.max_pages > MAX_PAGES {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between {} and {}, got {}",
            MIN_PAGES, MAX_PAGES, config.max_pages
        )));
    }

    if !(MIN_RATE_LIMIT..=MAX_RATE_LIMIT).contains(&config.rate_limit) {
        return Err(ConfigError::Validation(format!(
            "rate_limit must be between {} and {} requests/sec, got {}",
            MIN_RATE_LIMIT, MAX_RATE_LIMIT, config.rate_limit
        )));
    }

    if config.max_retries > 5 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 5, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= 20, got {}",
            config.max_redirects
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates bulk extraction configuration
fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    if config.concurrency < MIN_CONCURRENCY || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between {} and {}, got {}",
            MIN_CONCURRENCY, MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.max_urls < 1 {
        return Err(ConfigError::Validation(
            "max_urls must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
