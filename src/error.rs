// src/error.rs
use thiserror::Error;

use crate::driver::DriverError;

pub type Result<T> = std::result::Result<T, Error>;

/// Crawl error taxonomy. Field-level extraction problems never get
/// this far (the extractor null-fills instead); these are the kinds
/// the run loop matches on.
#[derive(Debug, Error)]
pub enum Error {
    /// The initial address search did not complete.
    #[error("search failed: {0}")]
    Search(#[source] DriverError),

    /// Element wait or click failed while iterating a page.
    #[error("page navigation failed: {0}")]
    Navigation(#[source] DriverError),

    /// The driver session is unusable. Terminal for the run.
    #[error("session error: {0}")]
    Session(#[source] DriverError),

    /// Output store I/O.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Bad caller-supplied configuration. The only kind `run` raises.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Classify a driver failure seen during page iteration or advance.
    pub fn from_navigation(e: DriverError) -> Self {
        if e.is_fatal() {
            Error::Session(e)
        } else {
            Error::Navigation(e)
        }
    }

    /// Session errors end the run immediately; the rest allow the loop
    /// to try the next page first.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Session(_))
    }
}
