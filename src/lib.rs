//! Swimmer-Crawler: a bounded-range athlete profile crawler
//!
//! This crate enumerates a numeric identifier range over a remote catalog of
//! swimmer profile pages, extracts a structured record from each page and
//! checkpoints the accumulated dataset to JSON after every batch.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod url;

use thiserror::Error;

pub use output::OutputError;

/// Main error type for crawler operations
///
/// Per-identifier fetch and extraction problems never surface here; they are
/// absorbed into [`crawler::FetchOutcome`] values. Only configuration, client
/// construction and persistence failures are fatal to a run.
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Persistence error: {0}")]
    Output(#[from] OutputError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL template errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Template is missing the {{id}} placeholder: {0}")]
    MissingPlaceholder(String),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator, FetchOutcome};
pub use model::{Competition, Event, RecordCollection, SwimmerRecord};
pub use output::CrawlStatistics;
