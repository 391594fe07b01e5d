//! Output module for run results and summaries
//!
//! This module handles:
//! - Exporting crawl and extract results as JSON
//! - Computing and printing run statistics

mod json;
pub mod stats;

pub use json::{write_json, write_json_to};
pub use stats::{print_statistics, render_statistics, CrawlStatistics};
