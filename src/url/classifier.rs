//! Pattern-based link classification
//!
//! A link is sorted into one of three classes by plain substring tests over
//! its lower-cased, query- and fragment-free form. The pattern tables are
//! ordered and evaluated in a fixed order; see [`LinkClassifier::classify`].

use std::fmt;

/// Path substrings of account, legal, support and navigation pages.
///
/// A link matching any of these is never expanded as a listing.
const EXCLUDED_PATTERNS: &[&str] = &[
    "reviews",
    "/edit",
    "/login",
    "/register",
    "/account",
    "/cart",
    "/checkout",
    "/wishlist",
    "/profile",
    "/about",
    "/contact",
    "/help",
    "/faq",
    "/support",
    "/terms",
    "/privacy",
    "/blog",
    "/news",
    "/careers",
    "/shipping",
    "/returns",
    "/orders",
    "/signin",
    "/order-history",
    "/subscription",
    "/subscriptions",
    "/user",
    "/dashboard",
    "/portal/",
    "/business",
    "/country",
    "/history",
    "/now",
];

/// Product-detail path segments, SKU/PID tokens and buy/detail/quickview indicators.
const PRODUCT_PATTERNS: &[&str] = &[
    "/product/",
    "p=",
    "pid=",
    "/pd/",
    "-pd-",
    "/item/",
    "sku=",
    "product_id=",
    "/buy/",
    "/description/",
    "/productdetail/",
    "/productinfo/",
    "/productview/",
    "/productshow/",
    "/productname/",
    "/productdescription/",
    "/p-",
    "/i-",
    "/v-",
    "/d-",
    "/id-",
    "/dp/",
    "/shopnow/",
    "/details/",
    "/buy-now",
    "/add-to-cart",
    "/sku-",
    "/model-",
    "/variant-",
    "/details-",
    "/config-",
    "/buyitnow",
    "/quickview/",
    "/buy",
];

/// Category, search, sort, filter and tag indicators that veto a product match.
const NON_PRODUCT_PATTERNS: &[&str] = &[
    "reviews",
    "/category/",
    "/categories/",
    "/collections/",
    "/search/",
    "/list/",
    "sort=",
    "filter=",
    "page=",
    "ref=",
    "type=",
    "brand=",
    "browse=",
    "/tag/",
    "/topic/",
    "viewall=",
    "dir=",
    "/store/",
    "/shop/",
    "/explore/",
    "/offers/",
    "/best/",
    "/deals/",
    "/featured/",
    "/promo/",
    "/hot/",
    "/new/",
    "/sale/",
    "/help/",
    "/business",
    "/country",
    "/history/",
];

/// Classification outcome for a single link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkClass {
    /// A product detail page - recorded as a result, never traversed
    Product,
    /// A page assumed to link to further products or listings - traversed
    ListingCandidate,
    /// An account/legal/support/navigation page - dropped
    Excluded,
}

impl LinkClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::ListingCandidate => "listing_candidate",
            Self::Excluded => "excluded",
        }
    }
}

impl fmt::Display for LinkClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable classifier holding the three pattern tables
///
/// Construct once and share (typically behind an `Arc`); classification never
/// mutates the classifier.
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    excluded: Vec<String>,
    product: Vec<String>,
    non_product: Vec<String>,
}

impl LinkClassifier {
    /// Creates a classifier with the built-in e-commerce pattern tables
    pub fn new() -> Self {
        Self::with_patterns(EXCLUDED_PATTERNS, PRODUCT_PATTERNS, NON_PRODUCT_PATTERNS)
    }

    /// Creates a classifier from custom pattern tables
    ///
    /// Patterns are lower-cased so they compare against the lower-cased link.
    pub fn with_patterns<S: AsRef<str>>(excluded: &[S], product: &[S], non_product: &[S]) -> Self {
        let lower = |patterns: &[S]| {
            patterns
                .iter()
                .map(|p| p.as_ref().to_lowercase())
                .collect::<Vec<_>>()
        };
        Self {
            excluded: lower(excluded),
            product: lower(product),
            non_product: lower(non_product),
        }
    }

    /// Classifies a URL (any string is accepted)
    ///
    /// # Evaluation Order
    ///
    /// 1. Product check, run unconditionally: no non-product indicator and at
    ///    least one product indicator.
    /// 2. Excluded check: any excluded pattern.
    /// 3. Otherwise a listing candidate.
    ///
    /// The product check is deliberately not gated on the excluded check, so a
    /// link such as `/account/product/1` is still reported as a product.
    ///
    /// # Examples
    ///
    /// ```
    /// use product_scout::url::{LinkClass, LinkClassifier};
    ///
    /// let classifier = LinkClassifier::new();
    /// assert_eq!(classifier.classify("https://x.com/product/123"), LinkClass::Product);
    /// assert_eq!(classifier.classify("https://x.com/category/shoes"), LinkClass::ListingCandidate);
    /// assert_eq!(classifier.classify("https://x.com/login"), LinkClass::Excluded);
    /// ```
    pub fn classify(&self, url: &str) -> LinkClass {
        if self.is_product(url) {
            LinkClass::Product
        } else if self.is_listing_candidate(url) {
            LinkClass::ListingCandidate
        } else {
            LinkClass::Excluded
        }
    }

    /// True if no non-product indicator matches and some product indicator does
    pub fn is_product(&self, url: &str) -> bool {
        let comparable = comparable_form(url);
        if matches_any(&self.non_product, &comparable) {
            return false;
        }
        matches_any(&self.product, &comparable)
    }

    /// True if the link is not excluded from listing expansion
    pub fn is_listing_candidate(&self, url: &str) -> bool {
        !matches_any(&self.excluded, &comparable_form(url))
    }
}

impl Default for LinkClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Lower-cases the URL and cuts it at the first `?` and `#`
fn comparable_form(url: &str) -> String {
    let lower = url.to_lowercase();
    let end = lower.find(['?', '#']).unwrap_or(lower.len());
    lower[..end].to_string()
}

fn matches_any(patterns: &[String], candidate: &str) -> bool {
    patterns.iter().any(|p| candidate.contains(p.as_str()))
}
