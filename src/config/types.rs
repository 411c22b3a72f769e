use serde::Deserialize;
use std::path::PathBuf;

/// Default profile page template
pub const DEFAULT_PROFILE_URL_TEMPLATE: &str = "https://lpin.ro/sportivi/detalii/{id}";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Identifier range and batching
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// First identifier to fetch (inclusive)
    #[serde(rename = "start-id")]
    pub start_id: u64,

    /// Last identifier to fetch (inclusive)
    #[serde(rename = "end-id")]
    pub end_id: u64,

    /// Number of identifiers fetched concurrently per batch
    #[serde(rename = "batch-size")]
    pub batch_size: u64,

    /// Fixed pause between batches (milliseconds)
    #[serde(rename = "batch-delay-ms")]
    pub batch_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_id: 0,
            end_id: 4136,
            batch_size: 10,
            batch_delay_ms: 1000,
        }
    }
}

/// HTTP session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Profile URL with an `{id}` placeholder
    #[serde(rename = "profile-url-template")]
    pub profile_url_template: String,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            profile_url_template: DEFAULT_PROFILE_URL_TEMPLATE.to_string(),
            user_agent: format!("swimmer-crawler/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the canonical file and the snapshots
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// Optional log file written alongside console output
    #[serde(rename = "log-file")]
    pub log_file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data"),
            log_file: None,
        }
    }
}
