//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with user agent and timeouts
//! - One GET per profile identifier, never retried
//! - Classifying the response into a record or an absence outcome
//! - Handing successful bodies to the extractor

use crate::config::HttpConfig;
use crate::crawler::extractor::extract_profile;
use crate::model::SwimmerRecord;
use crate::url::ProfileUrlTemplate;
use crate::CrawlerError;
use chrono::Utc;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Result of fetching one profile identifier
#[derive(Debug)]
pub enum FetchOutcome {
    /// The page held a profile
    Found(SwimmerRecord),

    /// The page could not be retrieved (non-2xx) or has no primary heading
    NotFound {
        /// HTTP status when the server answered with a non-success status
        status_code: Option<u16>,
    },

    /// Timeout, connection failure or unreadable body
    TransportFailure {
        /// Error description
        error: String,
    },
}

impl FetchOutcome {
    /// Returns the record, if any
    pub fn into_record(self) -> Option<SwimmerRecord> {
        match self {
            Self::Found(record) => Some(record),
            Self::NotFound { .. } | Self::TransportFailure { .. } => None,
        }
    }

    /// Returns true if a record was produced
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// A source of profile pages, one identifier at a time
///
/// Implementations absorb every per-identifier failure into the returned
/// [`FetchOutcome`]; a fetch never fails the run.
pub trait ProfileSource {
    /// Fetches and extracts the profile for one identifier
    fn fetch(&self, id: u64) -> impl Future<Output = FetchOutcome> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP session configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// The long-lived network session for one run
///
/// Wraps a connection-pooling [`Client`] shared by every concurrent fetch in
/// a batch. Opened once before the first batch and closed once after the last.
#[derive(Debug)]
pub struct ProfileClient {
    client: Client,
    template: ProfileUrlTemplate,
}

impl ProfileClient {
    /// Opens the session
    ///
    /// # Returns
    ///
    /// * `Ok(ProfileClient)` - Session ready for use
    /// * `Err(CrawlerError)` - Invalid URL template or client construction failure
    pub fn open(config: &HttpConfig) -> Result<Self, CrawlerError> {
        let template = ProfileUrlTemplate::parse(&config.profile_url_template)?;
        let client = build_http_client(config)?;

        tracing::debug!("Opened HTTP session for {}", template.as_str());

        Ok(Self { client, template })
    }

    /// Returns the URL fetched for an identifier
    pub fn profile_url(&self, id: u64) -> String {
        self.template.render(id)
    }

    /// Closes the session, releasing pooled connections
    pub fn close(self) {
        tracing::debug!("Closed HTTP session for {}", self.template.as_str());
    }
}

impl ProfileSource for ProfileClient {
    fn fetch(&self, id: u64) -> impl Future<Output = FetchOutcome> + Send {
        let url = self.profile_url(id);
        fetch_profile(&self.client, id, url)
    }
}

/// Fetches a single profile page
///
/// # Classification
///
/// | Condition | Outcome | Log |
/// |-----------|---------|-----|
/// | Non-2xx status | `NotFound` with status | warn |
/// | 2xx without primary heading | `NotFound` | none |
/// | Timeout, connect error, unreadable body | `TransportFailure` | error |
/// | 2xx with heading | `Found` | none |
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `id` - The profile identifier
/// * `url` - The rendered profile URL
pub async fn fetch_profile(client: &Client, id: u64, url: String) -> FetchOutcome {
    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => return transport_failure(id, &e),
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(
            "Failed to fetch data for swimmer ID {}. Status: {}",
            id,
            status.as_u16()
        );
        return FetchOutcome::NotFound {
            status_code: Some(status.as_u16()),
        };
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return transport_failure(id, &e),
    };

    match extract_profile(&body) {
        Some(profile) => FetchOutcome::Found(SwimmerRecord::from_body(id, profile, Utc::now())),
        None => {
            tracing::debug!("No profile heading for swimmer ID {}", id);
            FetchOutcome::NotFound { status_code: None }
        }
    }
}

/// Logs and wraps a transport-level error
fn transport_failure(id: u64, error: &reqwest::Error) -> FetchOutcome {
    let error = if error.is_timeout() {
        format!("Request timeout: {}", error)
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    };

    tracing::error!("Error fetching data for swimmer ID {}: {}", id, error);

    FetchOutcome::TransportFailure { error }
}
