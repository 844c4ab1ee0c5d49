//! Record collection derived from the latest landed list response

use recruitly_core::{EmployeeRecord, RecordId};
use tracing::warn;

/// Last-fetched ordered sequence of employee records
///
/// Only the list synchronizer replaces the contents; everything else reads.
/// Every record held has a non-empty identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordCollection {
    records: Vec<EmployeeRecord>,
    sequence: u64,
}

impl RecordCollection {
    /// Replace the contents with the response of list request `sequence`.
    /// Records without an identifier are dropped; returns how many were.
    pub(crate) fn replace(&mut self, sequence: u64, mut records: Vec<EmployeeRecord>) -> usize {
        let before = records.len();
        records.retain(|record| !record.id.is_empty());
        let dropped = before - records.len();
        if dropped > 0 {
            warn!(dropped, sequence, "dropping records without an identifier");
        }

        self.records = records;
        self.sequence = sequence;
        dropped
    }

    /// Records in service order
    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    /// Iterate over the records
    pub fn iter(&self) -> std::slice::Iter<'_, EmployeeRecord> {
        self.records.iter()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the last landed response was empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find a record by identifier
    pub fn get(&self, id: &RecordId) -> Option<&EmployeeRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Whether a record with this identifier is present
    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    /// Sequence number of the list request whose response is held; 0 before
    /// anything has landed
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a EmployeeRecord;
    type IntoIter = std::slice::Iter<'a, EmployeeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
