//! Crawler coordinator - one complete crawl run
//!
//! This module wires the run together:
//! - Opening the network session before the first fetch
//! - Driving the batch scheduler over the configured range
//! - Releasing the session on every exit path
//! - Reporting the final summary

use crate::config::Config;
use crate::crawler::fetcher::ProfileClient;
use crate::crawler::scheduler::{progress_bar, BatchPlan, FixedDelay, Scheduler};
use crate::model::RecordCollection;
use crate::output::{CrawlStatistics, JsonOutputHandler};
use crate::CrawlerError;
use std::time::Duration;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// The configuration is validated here so an invalid range or batch size
    /// is rejected before any network activity.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlerError)` - Configuration rejected
    pub fn new(config: Config) -> Result<Self, CrawlerError> {
        crate::config::validate(&config)?;
        Ok(Self { config })
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the batch plan for the configured range
    pub fn plan(&self) -> BatchPlan {
        BatchPlan::from_config(&self.config.crawler)
    }

    /// Runs the crawl
    ///
    /// The session is closed after the last batch or after a fatal
    /// persistence error, before that error is returned.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStatistics)` - Every batch fetched and persisted
    /// * `Err(CrawlerError)` - Session could not be opened or a checkpoint failed
    pub async fn run(&self) -> Result<CrawlStatistics, CrawlerError> {
        let session = ProfileClient::open(&self.config.http)?;

        let mut collection = RecordCollection::new();
        let mut output = JsonOutputHandler::new(&self.config.output.output_dir);
        let throttle = FixedDelay(Duration::from_millis(self.config.crawler.batch_delay_ms));

        let plan = self.plan();
        let result = Scheduler::new(&session, throttle, plan)
            .with_progress(progress_bar(plan.total_ids()))
            .run(&mut collection, &mut output)
            .await;

        session.close();

        match result {
            Ok(stats) => {
                tracing::info!(
                    "Crawling completed. Total swimmers processed: {}",
                    collection.len()
                );
                Ok(stats)
            }
            Err(e) => {
                tracing::error!(
                    "Crawl aborted after {} swimmers collected: {}",
                    collection.len(),
                    e
                );
                Err(e)
            }
        }
    }
}

/// Runs one complete crawl operation
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Example
///
/// ```no_run
/// use swimmer_crawler::config::Config;
/// use swimmer_crawler::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = Config::default();
/// config.crawler.start_id = 100;
/// config.crawler.end_id = 109;
/// let stats = run_crawl(config).await?;
/// println!("{} swimmers", stats.records_collected);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlStatistics, CrawlerError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
