//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client (user agent, default headers, timeout,
//!   redirect cap)
//! - Error classification into the exact texts reported per URL
//! - The two response classification orders: the crawl path skips non-HTML
//!   silently, the bulk path reports it as an error
//! - Handing the body to a blocking worker for parsing

use crate::config::{HttpConfig, UserAgentConfig};
use crate::crawler::content::truncate_chars;
use crate::crawler::parser::{parse_html, ParsedPage};
use crate::crawler::retry::is_retryable_message;
use crate::model::PageRecord;
use crate::UrlError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client, Response};
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// `Accept` header sent with every request
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Upper bound on the TCP/TLS connect phase
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Characters of an offending content-type kept in a bulk error
const CONTENT_TYPE_SNIPPET_CHARS: usize = 60;

/// Why a single URL could not be turned into a page
///
/// The `Display` text of each variant is exactly what ends up in the
/// `error` field of crawl and extract outcomes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("timeout")]
    Timeout,

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("connection error: {0}")]
    Connect(String),

    /// Any other transport failure, described by the HTTP client
    #[error("{0}")]
    Transport(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("non-HTML content-type: {0}")]
    NotHtml(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("extraction failed: {0}")]
    Extraction(String),
}

impl FetchError {
    /// Classifies a transport-level error from the HTTP client
    ///
    /// The request URL is dropped from the description so it can never
    /// influence retry classification.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_redirect() {
            FetchError::TooManyRedirects
        } else if err.is_connect() {
            FetchError::Connect(root_cause(&err))
        } else {
            FetchError::Transport(err.without_url().to_string())
        }
    }

    /// Returns true if another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        is_retryable_message(&self.to_string())
    }
}

impl From<UrlError> for FetchError {
    fn from(err: UrlError) -> Self {
        let reason = match err {
            UrlError::Parse(reason) => reason,
            UrlError::InvalidScheme(scheme) => format!("unsupported scheme '{}'", scheme),
            UrlError::MissingHost => "missing host".to_string(),
        };
        FetchError::InvalidUrl(reason)
    }
}

/// Innermost error message in a source chain
fn root_cause(err: &(dyn StdError + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

/// Result of a crawl-path fetch
#[derive(Debug)]
pub enum FetchResult {
    /// An HTML page was fetched and extracted
    Page(ParsedPage),

    /// The response was not HTML; not an error, not a page
    NonHtml {
        /// The `Content-Type` header value received (empty if absent)
        content_type: String,
    },

    /// The fetch failed
    Failed(FetchError),
}

impl FetchResult {
    /// The failure, if this result is one
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchResult::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The user agent is formatted as `Name/Version (+ContactURL; ContactEmail)`
/// and every request carries the HTML `Accept` header and the configured
/// `Accept-Language`. Redirects are followed up to `max_redirects` hops.
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::Config;
/// use site_harvest::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.http, &config.user_agent).unwrap();
/// ```
pub fn build_http_client(
    http: &HttpConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    match HeaderValue::from_str(&http.accept_language) {
        Ok(value) => {
            headers.insert(ACCEPT_LANGUAGE, value);
        }
        Err(_) => tracing::warn!(
            "Ignoring invalid Accept-Language value: {:?}",
            http.accept_language
        ),
    }

    let timeout = Duration::from_secs(http.timeout_secs);

    Client::builder()
        .user_agent(user_agent.header_value())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
        .redirect(Policy::limited(http.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one crawl frontier entry
///
/// # Classification Order
///
/// | Condition | Result |
/// |-----------|--------|
/// | Timeout | `Failed("timeout")` |
/// | Redirect cap exceeded | `Failed("too many redirects")` |
/// | Connection failure | `Failed("connection error: ...")` |
/// | Other transport failure | `Failed(<description>)` |
/// | Content-Type lacks `text/html` | `NonHtml` |
/// | Status >= 400 | `Failed("HTTP <status>")` |
/// | Otherwise | `Page` (parsed on a blocking worker) |
pub async fn fetch_page(client: &Client, url: &Url) -> FetchResult {
    let response = match send(client, url).await {
        Ok(response) => response,
        Err(error) => return FetchResult::Failed(error),
    };

    let content_type = content_type(&response);
    if !is_html(&content_type) {
        return FetchResult::NonHtml { content_type };
    }

    let status = response.status();
    if status.as_u16() >= 400 {
        return FetchResult::Failed(FetchError::Status(status.as_u16()));
    }

    match read_and_parse(response).await {
        Ok(parsed) => FetchResult::Page(parsed),
        Err(error) => FetchResult::Failed(error),
    }
}

/// Fetches and extracts one URL of a bulk run
///
/// Unlike [`fetch_page`], the status check comes before the content-type
/// check, and a non-HTML response is an error.
pub async fn fetch_document(client: &Client, url: &Url) -> Result<PageRecord, FetchError> {
    let response = send(client, url).await?;

    let status = response.status();
    if status.as_u16() >= 400 {
        return Err(FetchError::Status(status.as_u16()));
    }

    let content_type = content_type(&response);
    if !is_html(&content_type) {
        return Err(FetchError::NotHtml(truncate_chars(
            &content_type,
            CONTENT_TYPE_SNIPPET_CHARS,
        )));
    }

    read_and_parse(response).await.map(|parsed| parsed.page)
}

async fn send(client: &Client, url: &Url) -> Result<Response, FetchError> {
    client
        .get(url.clone())
        .send()
        .await
        .map_err(FetchError::from_reqwest)
}

fn content_type(response: &Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string()
}

fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

/// Reads the body and parses it off the async worker threads
async fn read_and_parse(response: Response) -> Result<ParsedPage, FetchError> {
    let final_url = response.url().clone();
    let body = response
        .text()
        .await
        .map_err(FetchError::from_reqwest)?;

    tokio::task::spawn_blocking(move || parse_html(&body, &final_url))
        .await
        .map_err(|e| FetchError::Extraction(e.to_string()))
}
