use crate::{UrlError, UrlResult};
use url::Url;

/// Computes the visited-set key for a URL
///
/// # Normalization Steps
///
/// 1. Remove fragment (everything after #)
/// 2. Strip trailing slashes from the path; an empty path becomes /
/// 3. Remove an empty query string (trailing ?)
/// 4. Lowercase the whole string
///
/// Scheme, port, path parameters and query are otherwise kept as-is, so
/// `http://` and `https://` variants of a page are distinct keys.
///
/// # Examples
///
/// ```
/// use site_harvest::url::normalize_url;
/// use url::Url;
///
/// let url = Url::parse("https://Example.com/Docs/#intro").unwrap();
/// assert_eq!(normalize_url(&url), "https://example.com/docs");
/// ```
pub fn normalize_url(url: &Url) -> String {
    let mut url = url.clone();

    url.set_fragment(None);

    let path = url.path().trim_end_matches('/').to_string();
    if path.is_empty() {
        url.set_path("/");
    } else {
        url.set_path(&path);
    }

    if url.query() == Some("") {
        url.set_query(None);
    }

    url.as_str().to_lowercase()
}

/// Parses a user-supplied URL, accepting only absolute http(s) URLs with a host
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL
/// * `Err(UrlError)` - Unparsable, non-http(s), or host-less input
pub fn parse_http_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }
    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
