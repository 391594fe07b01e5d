use url::Url;

/// Extracts the site authority from a URL
///
/// The authority is the lowercase host, followed by `:port` when the URL
/// carries a non-default port. It is what the crawl uses as its base
/// domain and what links are compared against.
///
/// # Returns
///
/// * `Some(String)` - The lowercase host (with port, if explicit)
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_harvest::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_domain(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Decides whether a link stays on the crawl's target site
///
/// A link is in scope when its authority equals the base domain, or the
/// two differ only by a leading `www.` on either side. Other subdomains
/// (`blog.example.com` vs `example.com`) are out of scope.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_harvest::url::is_in_scope;
///
/// let link = Url::parse("https://www.example.com/x").unwrap();
/// assert!(is_in_scope(&link, "example.com"));
///
/// let link = Url::parse("https://other.com/x").unwrap();
/// assert!(!is_in_scope(&link, "example.com"));
/// ```
pub fn is_in_scope(link: &Url, base_domain: &str) -> bool {
    let Some(host) = extract_domain(link) else {
        return false;
    };
    let base = base_domain.to_lowercase();

    host == base
        || host.strip_prefix("www.") == Some(base.as_str())
        || base.strip_prefix("www.") == Some(host.as_str())
}
