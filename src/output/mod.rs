//! Output module for persisting crawl results
//!
//! This module handles:
//! - Writing the canonical JSON dataset after every batch
//! - Writing a timestamped, never-overwritten snapshot next to it
//! - Recording and printing run statistics

mod json;
mod stats;
mod traits;

pub use json::{JsonOutputHandler, CANONICAL_FILE_NAME, SNAPSHOT_PREFIX};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputHandler, OutputResult, PersistedFiles};
