// src/aggregate.rs
use std::collections::HashSet;

use crate::record::{Record, RunResult};

/// Running table of unique records plus visit counters.
///
/// The same entry can reappear across pages when the portal's
/// pagination state wobbles; exact-duplicate rows are dropped on
/// merge, first occurrence wins. Always in a returnable state, so an
/// interrupted run can snapshot it at any point.
#[derive(Debug, Default)]
pub struct Aggregator {
    records: Vec<Record>,
    seen: HashSet<Record>,
    entries_visited: usize,
    pages_visited: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more results page.
    pub fn note_page(&mut self) {
        self.pages_visited += 1;
    }

    /// Count entries looked at, duplicates and failures included.
    pub fn note_entries(&mut self, n: usize) {
        self.entries_visited += n;
    }

    /// Fold one page's records in, dropping rows already present.
    /// Merging the same batch twice leaves the table unchanged.
    pub fn merge(&mut self, batch: Vec<Record>) {
        for rec in batch {
            if self.seen.insert(rec.clone()) {
                self.records.push(rec);
            }
        }
    }

    pub fn unique_count(&self) -> usize {
        self.records.len()
    }

    /// Current contents as a valid result, callable mid-run.
    pub fn snapshot(&self) -> RunResult {
        RunResult {
            records: self.records.clone(),
            entries_visited: self.entries_visited,
            pages_visited: self.pages_visited,
        }
    }

    /// Final result, consuming the aggregator.
    pub fn into_result(self) -> RunResult {
        RunResult {
            records: self.records,
            entries_visited: self.entries_visited,
            pages_visited: self.pages_visited,
        }
    }
}
