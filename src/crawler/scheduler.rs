//! Batch scheduler for driving the identifier range
//!
//! This module handles:
//! - Partitioning the inclusive identifier range into fixed-size batches
//! - Concurrent fan-out of fetches within a batch, with a barrier at the end
//! - Appending settled records to the run collection
//! - Persisting the full collection after every batch
//! - The fixed pause between batches
//! - Terminal progress, one tick per settled fetch

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{FetchOutcome, ProfileSource};
use crate::model::RecordCollection;
use crate::output::{CrawlStatistics, OutputHandler};
use crate::CrawlerError;
use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::ops::RangeInclusive;
use std::time::Duration;

/// The inclusive identifier range cut into contiguous batches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    start_id: u64,
    end_id: u64,
    batch_size: u64,
}

impl BatchPlan {
    /// Creates a plan over `[start_id, end_id]`
    ///
    /// A `batch_size` of zero is treated as one; configuration validation
    /// rejects it before a plan is ever built.
    pub fn new(start_id: u64, end_id: u64, batch_size: u64) -> Self {
        Self {
            start_id,
            end_id,
            batch_size: batch_size.max(1),
        }
    }

    /// Creates a plan from crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.start_id, config.end_id, config.batch_size)
    }

    /// Number of identifiers covered by the plan
    pub fn total_ids(&self) -> u64 {
        if self.end_id < self.start_id {
            return 0;
        }
        // Saturates for a range spanning the whole u64 domain
        (self.end_id - self.start_id).saturating_add(1)
    }

    /// Number of batches; the last one may be shorter
    pub fn batch_count(&self) -> u64 {
        self.total_ids().div_ceil(self.batch_size)
    }

    /// Iterates the batches in ascending order
    pub fn batches(&self) -> impl Iterator<Item = RangeInclusive<u64>> {
        let plan = *self;
        (0..plan.batch_count()).map(move |index| {
            let first = plan.start_id + index * plan.batch_size;
            let last = first.saturating_add(plan.batch_size - 1).min(plan.end_id);
            first..=last
        })
    }
}

/// The pause applied between two batches
///
/// Injected so tests can run without waiting on real time.
pub trait Throttle {
    /// Waits before the next batch starts
    fn pause(&self) -> impl Future<Output = ()> + Send;
}

/// Sleeps for a fixed duration, regardless of how long the batch took
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Throttle for FixedDelay {
    fn pause(&self) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(self.0)
    }
}

/// Does not pause at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Throttle for NoDelay {
    fn pause(&self) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }
}

/// Scheduler drives every batch of the plan to completion
///
/// State per run:
///
/// ```text
/// NotStarted -> FetchingBatch(0) -> Throttling(0) -> FetchingBatch(1) -> ... -> Completed
/// ```
///
/// No throttling follows the final batch.
pub struct Scheduler<'a, S, T> {
    /// Where profiles come from
    source: &'a S,

    /// Pause between batches
    throttle: T,

    /// Batches to run
    plan: BatchPlan,

    /// Ticks once per settled fetch; hidden unless set
    progress: ProgressBar,
}

/// Creates the progress bar for a run over `total_ids` identifiers
///
/// The bar draws to stderr and stays hidden when stderr is not a terminal.
pub fn progress_bar(total_ids: u64) -> ProgressBar {
    let bar = ProgressBar::new(total_ids);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

impl<'a, S, T> Scheduler<'a, S, T>
where
    S: ProfileSource,
    T: Throttle,
{
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `source` - The shared profile source (the run's network session)
    /// * `throttle` - The inter-batch pause
    /// * `plan` - The batches to run
    pub fn new(source: &'a S, throttle: T, plan: BatchPlan) -> Self {
        Self {
            source,
            throttle,
            plan,
            progress: ProgressBar::hidden(),
        }
    }

    /// Reports progress on `bar` instead of a hidden one
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = bar;
        self
    }

    /// Returns the plan
    pub fn plan(&self) -> &BatchPlan {
        &self.plan
    }

    /// Runs every batch
    ///
    /// The collection is only mutated here, between fetch phases. After each
    /// batch the whole collection is handed to `output`; a persistence error
    /// stops the run immediately and is returned.
    ///
    /// # Arguments
    ///
    /// * `collection` - The run collection, owned by the caller
    /// * `output` - Where each batch checkpoint is written
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStatistics)` - All batches completed and persisted
    /// * `Err(CrawlerError)` - A checkpoint could not be written
    pub async fn run(
        &self,
        collection: &mut RecordCollection,
        output: &mut dyn OutputHandler,
    ) -> Result<CrawlStatistics, CrawlerError> {
        let total_ids = self.plan.total_ids();
        let batch_count = self.plan.batch_count();
        let mut stats = CrawlStatistics::new(total_ids);

        tracing::info!(
            "Crawling {} identifiers in {} batches",
            total_ids,
            batch_count
        );

        for (index, batch) in self.plan.batches().enumerate() {
            tracing::debug!(
                "Fetching batch {}/{}: IDs {}..={}",
                index + 1,
                batch_count,
                batch.start(),
                batch.end()
            );

            let batch_len = batch.end() - batch.start() + 1;
            let outcomes = self.fetch_batch(batch).await;

            let mut records = Vec::with_capacity(outcomes.len());
            for outcome in outcomes {
                stats.record_outcome(&outcome);
                if let Some(record) = outcome.into_record() {
                    records.push(record);
                }
            }
            collection.extend_batch(records);

            let files = output.persist(collection.records(), index)?;
            stats.record_checkpoint(&files);
            stats.identifiers_processed += batch_len;
            self.progress
                .set_message(format!("{} swimmers", collection.len()));

            tracing::info!(
                "Progress: {}/{} identifiers processed, {} swimmers collected",
                stats.identifiers_processed,
                total_ids,
                collection.len()
            );

            if (index as u64) + 1 < batch_count {
                self.throttle.pause().await;
            }
        }

        stats.records_collected = collection.len() as u64;
        self.progress
            .finish_with_message(format!("{} swimmers collected", collection.len()));
        Ok(stats)
    }

    /// Fetches one batch concurrently and waits for every fetch to settle
    ///
    /// Outcomes are returned in completion order.
    async fn fetch_batch(&self, batch: RangeInclusive<u64>) -> Vec<FetchOutcome> {
        let mut pending = batch
            .map(|id| self.source.fetch(id))
            .collect::<FuturesUnordered<_>>();

        let mut outcomes = Vec::with_capacity(pending.len());
        while let Some(outcome) = pending.next().await {
            self.progress.inc(1);
            outcomes.push(outcome);
        }
        outcomes
    }
}
