// src/progress.rs
/// Lightweight progress reporting used by long-running crawls.
/// Frontends (CLI, tests) implement this to surface status to users.
pub trait Progress {
    /// Called when a results page has been walked and merged,
    /// with its 1-based number and entry count.
    fn page_done(&mut self, _page: usize, _entries: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one entry's detail view has been captured.
    fn entry_done(&mut self, _index: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
