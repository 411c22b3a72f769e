//! JSON checkpoint writer
//!
//! Each checkpoint writes the full collection twice:
//! - `<dir>/swimmers_data.json`, replaced atomically (temp file + rename) so
//!   a crash mid-write leaves the previous batch's file intact
//! - `<dir>/swimmers_data_<YYYYMMDD_HHMMSS>.json`, created fresh and never
//!   overwritten; a taken name is retried as `_b<batch index>`, then
//!   `_b<batch index>_1`, `_b<batch index>_2` and so on

use crate::model::SwimmerRecord;
use crate::output::traits::{OutputError, OutputHandler, OutputResult, PersistedFiles};
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File name of the canonical dataset
pub const CANONICAL_FILE_NAME: &str = "swimmers_data.json";

/// File name prefix of snapshots
pub const SNAPSHOT_PREFIX: &str = "swimmers_data_";

/// Writes checkpoints as pretty-printed UTF-8 JSON arrays
#[derive(Debug, Clone)]
pub struct JsonOutputHandler {
    output_dir: PathBuf,
}

impl JsonOutputHandler {
    /// Creates a handler writing into `output_dir`
    ///
    /// The directory is created on first write.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Returns the output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the canonical file path
    pub fn canonical_path(&self) -> PathBuf {
        self.output_dir.join(CANONICAL_FILE_NAME)
    }

    /// Returns the snapshot path for a timestamp
    pub fn snapshot_path(&self, now: &DateTime<Local>) -> PathBuf {
        self.output_dir
            .join(format!("{}{}.json", SNAPSHOT_PREFIX, now.format("%Y%m%d_%H%M%S")))
    }

    /// Writes one checkpoint stamped with `now`
    ///
    /// # Arguments
    ///
    /// * `records` - The full collection
    /// * `batch_index` - Batch that triggered the write, used on snapshot name collision
    /// * `now` - Wall-clock time for the snapshot name
    pub fn write_checkpoint(
        &self,
        records: &[SwimmerRecord],
        batch_index: usize,
        now: DateTime<Local>,
    ) -> OutputResult<PersistedFiles> {
        fs::create_dir_all(&self.output_dir).map_err(|source| OutputError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let contents = serde_json::to_vec_pretty(records)?;

        let canonical = self.canonical_path();
        write_replacing(&canonical, &contents)?;

        let snapshot = self.write_snapshot(&contents, batch_index, &now)?;

        tracing::info!(
            "Data saved to {} and backup created at {}",
            canonical.display(),
            snapshot.display()
        );

        Ok(PersistedFiles {
            canonical,
            snapshot,
        })
    }

    /// Creates the snapshot file under the first free name
    ///
    /// Existing snapshots are never touched; only I/O errors fail here.
    fn write_snapshot(
        &self,
        contents: &[u8],
        batch_index: usize,
        now: &DateTime<Local>,
    ) -> OutputResult<PathBuf> {
        let primary = self.snapshot_path(now);
        if write_new(&primary, contents)? {
            return Ok(primary);
        }

        let stem = format!(
            "{}{}_b{}",
            SNAPSHOT_PREFIX,
            now.format("%Y%m%d_%H%M%S"),
            batch_index
        );
        let mut attempt: u32 = 0;
        loop {
            let fallback = match attempt {
                0 => self.output_dir.join(format!("{}.json", stem)),
                n => self.output_dir.join(format!("{}_{}.json", stem, n)),
            };
            if write_new(&fallback, contents)? {
                tracing::debug!(
                    "Snapshot {} already existed, wrote {} instead",
                    primary.display(),
                    fallback.display()
                );
                return Ok(fallback);
            }
            attempt += 1;
        }
    }
}

impl OutputHandler for JsonOutputHandler {
    fn persist(
        &mut self,
        records: &[SwimmerRecord],
        batch_index: usize,
    ) -> OutputResult<PersistedFiles> {
        self.write_checkpoint(records, batch_index, Local::now())
    }
}

/// Replaces `path` with `contents` via a sibling temp file and a rename
fn write_replacing(path: &Path, contents: &[u8]) -> OutputResult<()> {
    let tmp = path.with_extension("json.tmp");

    fs::write(&tmp, contents).map_err(|source| OutputError::Write {
        path: tmp.clone(),
        source,
    })?;

    fs::rename(&tmp, path).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `contents` to a file that must not exist yet
///
/// Returns `Ok(false)` when the file already exists.
fn write_new(path: &Path, contents: &[u8]) -> OutputResult<bool> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(source) => {
            return Err(OutputError::Write {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    file.write_all(contents)
        .and_then(|_| file.sync_all())
        .map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(true)
}
