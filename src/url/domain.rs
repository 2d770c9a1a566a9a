use url::Url;

/// Extracts the lower-cased host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use product_scout::url::extract_domain;
///
/// let url = Url::parse("https://SHOP.test/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("shop.test".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether a URL belongs to the crawled domain
///
/// A leading `www.` is ignored on both sides; the host must then equal the
/// domain or be one of its subdomains.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use product_scout::url::belongs_to_domain;
///
/// let url = Url::parse("https://shop.test/product/1").unwrap();
/// assert!(belongs_to_domain(&url, "www.shop.test"));
///
/// let url = Url::parse("https://tracker.example/pixel").unwrap();
/// assert!(!belongs_to_domain(&url, "shop.test"));
/// ```
pub fn belongs_to_domain(url: &Url, domain: &str) -> bool {
    let Some(host) = extract_domain(url) else {
        return false;
    };
    let domain = domain.to_lowercase();
    let host = strip_www(&host);
    let base = strip_www(&domain);

    host == base || host.ends_with(&format!(".{}", base))
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
