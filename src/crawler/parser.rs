//! HTML queries over rendered markup
//!
//! This module handles parsing rendered HTML to extract:
//! - Hyperlink targets (raw `href` values, unresolved)
//! - Pagination controls matching a selector set

use crate::crawler::renderer::PaginationControl;
use scraper::{Html, Selector};

/// Extracts the raw `href` values of all anchors in the document
///
/// # Link Extraction Rules
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
/// - Empty hrefs
///
/// Values are returned as written in the markup, in document order; resolving
/// them is left to URL normalization.
///
/// # Example
///
/// ```
/// use product_scout::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/product/1">P</a><a href="mailto:x@y.z">M</a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["/product/1".to_string()]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut hrefs = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if is_followable(href) {
                    hrefs.push(href.trim().to_string());
                }
            }
        }
    }

    hrefs
}

/// Finds the first element matching one of `selectors`, tried in order
///
/// With `require_href`, elements without a usable link target are skipped;
/// a renderer that cannot click can only follow anchors.
pub fn find_control(
    html: &str,
    selectors: &[&str],
    require_href: bool,
) -> Option<PaginationControl> {
    let document = Html::parse_document(html);

    for raw in selectors {
        let selector = match Selector::parse(raw) {
            Ok(selector) => selector,
            Err(e) => {
                tracing::warn!("Ignoring invalid selector {}: {:?}", raw, e);
                continue;
            }
        };

        for element in document.select(&selector) {
            let href = element
                .value()
                .attr("href")
                .filter(|href| is_followable(href))
                .map(|href| href.trim().to_string());

            if require_href && href.is_none() {
                continue;
            }

            return Some(PaginationControl {
                selector: raw.to_string(),
                href,
            });
        }
    }

    None
}

fn is_followable(href: &str) -> bool {
    let href = href.trim();
    !(href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:"))
}
