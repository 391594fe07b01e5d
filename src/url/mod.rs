//! URL handling module for Site-Harvest
//!
//! This module provides the visited-set key normalization, site authority
//! extraction, and the crawl's domain scope filter.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, is_in_scope};
pub use normalize::{normalize_url, parse_http_url};
