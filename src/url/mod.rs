//! URL handling module for Product-Scout
//!
//! This module turns raw hrefs into canonical URLs, decides whether a link
//! belongs to the crawled domain, and classifies links as products, listing
//! candidates or excluded pages.

mod classifier;
mod domain;
mod normalize;

// Re-export main functions
pub use classifier::{LinkClass, LinkClassifier};
pub use domain::{belongs_to_domain, extract_domain};
pub use normalize::{domain_root, normalize, with_trailing_slash};
