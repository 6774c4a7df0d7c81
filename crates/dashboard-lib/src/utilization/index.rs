//! Request-id keyed view over a utilization snapshot

use crate::models::RequestUtilization;
use std::collections::HashMap;

/// Utilization records keyed by request id, in upstream order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UtilizationIndex {
    records: Vec<RequestUtilization>,
    by_request: HashMap<String, usize>,
}

impl UtilizationIndex {
    /// Build an index keeping the first record for each request id.
    ///
    /// Returns the ids that appeared more than once, each listed once.
    pub fn from_records(records: Vec<RequestUtilization>) -> (Self, Vec<String>) {
        let mut index = Self::default();
        let mut duplicates = Vec::new();

        for record in records {
            if index.by_request.contains_key(&record.request_id) {
                if !duplicates.contains(&record.request_id) {
                    duplicates.push(record.request_id.clone());
                }
                continue;
            }
            index
                .by_request
                .insert(record.request_id.clone(), index.records.len());
            index.records.push(record);
        }

        (index, duplicates)
    }

    /// Look up the record for a request
    pub fn get(&self, request_id: &str) -> Option<&RequestUtilization> {
        self.by_request
            .get(request_id)
            .and_then(|&position| self.records.get(position))
    }

    /// All records in upstream order
    pub fn records(&self) -> &[RequestUtilization] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
