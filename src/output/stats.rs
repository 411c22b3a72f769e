//! Run statistics
//!
//! This module tracks what a crawl run produced and prints the summary shown
//! when the run ends.

use crate::crawler::FetchOutcome;
use crate::output::PersistedFiles;
use std::path::PathBuf;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Identifiers in the configured range
    pub total_ids: u64,

    /// Identifiers whose batch has completed
    pub identifiers_processed: u64,

    /// Records in the final collection
    pub records_collected: u64,

    /// Non-2xx responses and pages without a profile heading
    pub not_found: u64,

    /// Timeouts, connection errors and unreadable bodies
    pub transport_failures: u64,

    /// Batches fetched and persisted
    pub batches_completed: u64,

    /// Path of the canonical file, once written
    pub canonical_file: Option<PathBuf>,

    /// Every snapshot written, in batch order
    pub snapshots: Vec<PathBuf>,
}

impl CrawlStatistics {
    /// Creates empty statistics for a range of `total_ids` identifiers
    pub fn new(total_ids: u64) -> Self {
        Self {
            total_ids,
            ..Self::default()
        }
    }

    /// Counts one fetch outcome
    pub fn record_outcome(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Found(_) => {}
            FetchOutcome::NotFound { .. } => self.not_found += 1,
            FetchOutcome::TransportFailure { .. } => self.transport_failures += 1,
        }
    }

    /// Counts one persisted batch
    pub fn record_checkpoint(&mut self, files: &PersistedFiles) {
        self.batches_completed += 1;
        self.canonical_file = Some(files.canonical.clone());
        self.snapshots.push(files.snapshot.clone());
    }

    /// Returns the share of processed identifiers that yielded a record, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.identifiers_processed == 0 {
            return 0.0;
        }
        (self.records_collected as f64 / self.identifiers_processed as f64) * 100.0
    }
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!(
        "  Identifiers processed: {} / {}",
        stats.identifiers_processed, stats.total_ids
    );
    println!("  Batches completed: {}", stats.batches_completed);
    println!("  Swimmers collected: {}", stats.records_collected);
    println!("  Not found: {}", stats.not_found);
    println!("  Transport failures: {}", stats.transport_failures);
    println!();

    println!("Output:");
    match &stats.canonical_file {
        Some(path) => println!("  Dataset: {}", path.display()),
        None => println!("  Dataset: (not written)"),
    }
    println!("  Snapshots written: {}", stats.snapshots.len());
    if let Some(last) = stats.snapshots.last() {
        println!("  Latest snapshot: {}", last.display());
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} identifiers yielded a profile)",
        stats.success_rate(),
        stats.records_collected,
        stats.identifiers_processed
    );
}
