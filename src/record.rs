// src/record.rs

/// Output column order. Matches the store header exactly.
pub const COLUMNS: [&str; 8] = [
    "address",
    "ward",
    "application number",
    "application type",
    "date submitted",
    "status",
    "description",
    "link",
];

/// One committee application, as captured from an entry's detail view.
///
/// Every field is always present; a field that could not be captured is
/// an empty string, never a missing column. Values are normalized
/// lowercase (see `extract`). Never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Record {
    pub address: String,
    pub ward: String,
    pub application_number: String,
    pub application_type: String,
    pub date_submitted: String,
    pub status: String,
    pub description: String,
    pub link: String,
}

impl Record {
    /// Store row in `COLUMNS` order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.address.clone(),
            self.ward.clone(),
            self.application_number.clone(),
            self.application_type.clone(),
            self.date_submitted.clone(),
            self.status.clone(),
            self.description.clone(),
            self.link.clone(),
        ]
    }
}

/// What a finished (or interrupted) crawl hands back.
///
/// `records` is deduplicated in first-seen order. `entries_visited`
/// counts every entry the crawl looked at, duplicates and failed
/// extractions included, so it can exceed `records.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub records: Vec<Record>,
    pub entries_visited: usize,
    pub pages_visited: usize,
}
