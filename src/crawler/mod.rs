//! Crawler module for profile fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTML extraction of swimmer profiles
//! - HTTP fetching with outcome classification
//! - Batch scheduling and throttling
//! - Overall run coordination

mod coordinator;
mod extractor;
mod fetcher;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator};
pub use extractor::{
    classify_attribute, extract_from_document, extract_profile, parse_birth_year,
    parse_competition_title, AttributeKey, CompetitionTitle, FieldOutcome,
};
pub use fetcher::{build_http_client, fetch_profile, FetchOutcome, ProfileClient, ProfileSource};
pub use scheduler::{progress_bar, BatchPlan, FixedDelay, NoDelay, Scheduler, Throttle};
