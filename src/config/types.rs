use serde::Deserialize;

/// Main configuration structure for Site-Harvest
///
/// Every section is optional in the TOML file; missing sections and keys
/// take the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub extract: ExtractConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum link depth followed from the seed URL
    pub max_depth: u32,

    /// Maximum number of pages accepted per crawl
    pub max_pages: usize,

    /// Maximum requests per second across the whole crawl
    pub rate_limit: f64,

    /// Additional attempts for transient failures
    pub max_retries: u32,

    /// Base backoff between retries (milliseconds); attempt N waits N times this
    pub retry_backoff_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_pages: 50,
            rate_limit: 1.0,
            max_retries: 2,
            retry_backoff_ms: 1500,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Maximum redirect hops followed per request
    pub max_redirects: usize,

    /// Value of the Accept-Language header
    pub accept_language: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            max_redirects: 5,
            accept_language: "it,en;q=0.9".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,

    /// Email address for crawler-related contact
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SiteHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/bot".to_string(),
            contact_email: "bot@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Bulk extraction configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractConfig {
    /// Maximum fetches in flight at once
    pub concurrency: usize,

    /// Maximum URLs accepted per bulk request
    pub max_urls: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            max_urls: 50,
        }
    }
}

/// Per-call crawl limits
///
/// These normally come from an API request or the command line, so they
/// are kept apart from the long-lived [`Config`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrawlParams {
    pub max_depth: u32,
    pub max_pages: usize,
    pub rate_limit: f64,
}

impl From<&CrawlerConfig> for CrawlParams {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_pages: config.max_pages,
            rate_limit: config.rate_limit,
        }
    }
}

impl Default for CrawlParams {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}
