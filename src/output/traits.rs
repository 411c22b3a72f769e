//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! errors they report.

use crate::model::SwimmerRecord;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
///
/// Every variant is fatal to the run.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output directory {path}: {source}", path = .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}", path = .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Files written by one checkpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFiles {
    /// The stable-path file, overwritten every batch
    pub canonical: PathBuf,

    /// The timestamped copy for this batch
    pub snapshot: PathBuf,
}

/// Trait for output handlers
///
/// Called once per completed batch with the whole collection so far, never a
/// diff. Calls are strictly sequential.
pub trait OutputHandler {
    /// Persists the full current collection
    ///
    /// # Arguments
    ///
    /// * `records` - Every record collected so far
    /// * `batch_index` - Zero-based index of the batch that just completed
    ///
    /// # Returns
    ///
    /// The files written
    fn persist(&mut self, records: &[SwimmerRecord], batch_index: usize)
        -> OutputResult<PersistedFiles>;
}
