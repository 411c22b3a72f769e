use crate::model::SwimmerRecord;
use std::collections::HashSet;

/// The records accumulated over one crawl run
///
/// The coordinator owns the collection and the scheduler borrows it mutably
/// between fetch phases only, so there is exactly one writer at any time and
/// no locking. The collection only grows; it is never merged with the output
/// of a previous run.
#[derive(Debug, Default)]
pub struct RecordCollection {
    /// Records in the order they were appended
    records: Vec<SwimmerRecord>,

    /// Identifiers already present, to keep one record per identifier
    ids: HashSet<u64>,
}

impl RecordCollection {
    /// Creates an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record unless one with the same identifier is already present
    ///
    /// # Returns
    ///
    /// `true` if the record was appended
    pub fn push(&mut self, record: SwimmerRecord) -> bool {
        if !self.ids.insert(record.id) {
            tracing::warn!("Ignoring duplicate record for swimmer ID {}", record.id);
            return false;
        }
        self.records.push(record);
        true
    }

    /// Appends every record of a settled batch, preserving their order
    ///
    /// # Returns
    ///
    /// The number of records appended
    pub fn extend_batch(&mut self, batch: impl IntoIterator<Item = SwimmerRecord>) -> usize {
        let mut added = 0;
        for record in batch {
            if self.push(record) {
                added += 1;
            }
        }
        added
    }

    /// Returns all records in append order
    pub fn records(&self) -> &[SwimmerRecord] {
        &self.records
    }

    /// Returns the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns whether a record for the identifier is present
    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    /// Consumes the collection, returning its records
    pub fn into_records(self) -> Vec<SwimmerRecord> {
        self.records
    }
}
