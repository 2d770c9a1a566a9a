use crate::{UrlError, UrlResult};
use url::{ParseError, Url};

/// Resolves a raw href into its canonical absolute form
///
/// # Normalization Steps
///
/// 1. Resolve the href against `https://{domain_hint}/`:
///    - protocol-relative (`//host/path`) takes the `https` scheme
///    - absolute-path (`/path`) is placed under the domain root
///    - bare-relative (`page.html`) is placed under the domain root
///    - absolute URLs are kept as they are
/// 2. Reject anything that is not HTTP(S) or has no host
/// 3. Remove the query string and the fragment
/// 4. Remove trailing path slashes, except for the root `/`
///
/// Host lowercasing, default-port removal and dot-segment removal are
/// done by the URL parser itself.
///
/// The result is a fixed point: normalizing a canonical URL returns it unchanged.
///
/// # Examples
///
/// ```
/// use product_scout::url::normalize;
///
/// let url = normalize("/shoes/?color=red#top", "shop.test").unwrap();
/// assert_eq!(url.as_str(), "https://shop.test/shoes");
///
/// let root = normalize("https://shop.test", "shop.test").unwrap();
/// assert_eq!(root.as_str(), "https://shop.test/");
/// ```
pub fn normalize(raw_href: &str, domain_hint: &str) -> UrlResult<Url> {
    let href = raw_href.trim();
    if href.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut url = match Url::parse(href) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => domain_base(domain_hint)?
            .join(href)
            .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?,
        Err(e) => return Err(UrlError::Parse(format!("{}: {}", href, e))),
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_query(None);
    url.set_fragment(None);

    let path = url.path();
    let trimmed = path.trim_end_matches('/');
    if trimmed.len() != path.len() {
        let canonical_path = if trimmed.is_empty() { "/" } else { trimmed }.to_string();
        url.set_path(&canonical_path);
    }

    Ok(url)
}

/// Returns the canonical root URL of a domain, `https://{domain}/`
pub fn domain_root(domain: &str) -> UrlResult<Url> {
    normalize(&format!("https://{}", domain), domain)
}

/// Returns the same URL with a trailing slash appended to its path
///
/// Used to catch pages recorded in their non-canonical slash form.
pub fn with_trailing_slash(url: &Url) -> Option<Url> {
    if url.path().ends_with('/') {
        return None;
    }
    let mut variant = url.clone();
    let path = format!("{}/", url.path());
    variant.set_path(&path);
    Some(variant)
}

fn domain_base(domain_hint: &str) -> UrlResult<Url> {
    Url::parse(&format!("https://{}/", domain_hint))
        .map_err(|e| UrlError::Parse(format!("invalid domain '{}': {}", domain_hint, e)))
}
