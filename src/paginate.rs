// src/paginate.rs
use std::time::Duration;

use crate::driver::{DriverResult, PageDriver, Target, WaitCond};
use crate::error::{Error, Result};

/// Where the traversal currently stands.
/// Stopped and Failed are terminal; Failed still means "return what
/// was collected", never "throw the run away".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Ready,
    PageLoaded,
    Advancing,
    Stopped,
    Failed,
}

/// Decides when the listing ends and drives the page-to-page moves.
///
/// The stop rule is content-based: a page at or under the full-page
/// threshold is taken to be the final page. The listing UI fills every
/// page past the threshold except the last one; that assumption is an
/// observation about the portal, not a guarantee.
pub struct Paginator {
    threshold: usize,
    timeout: Duration,
    state: CrawlState,
}

impl Paginator {
    pub fn new(threshold: usize, timeout: Duration) -> Self {
        Self {
            threshold,
            timeout,
            state: CrawlState::Ready,
        }
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Entry count of the page currently showing. Success marks the
    /// page loaded; failure is terminal.
    pub fn count_entries(&mut self, driver: &mut dyn PageDriver) -> Result<usize> {
        match driver.find_all(Target::EntryRow) {
            Ok(entries) => {
                self.state = CrawlState::PageLoaded;
                Ok(entries.len())
            }
            Err(e) => {
                self.state = CrawlState::Failed;
                Err(Error::from_navigation(e))
            }
        }
    }

    /// True when `count` marks the final page.
    pub fn should_stop(&self, count: usize) -> bool {
        count <= self.threshold
    }

    /// Mark a clean end of traversal.
    pub fn stop(&mut self) {
        self.state = CrawlState::Stopped;
    }

    /// Mark traversal dead after a failure elsewhere in the loop.
    pub fn fail(&mut self) {
        self.state = CrawlState::Failed;
    }

    /// Move to the next page. Failure is terminal for the traversal.
    pub fn advance(&mut self, driver: &mut dyn PageDriver) -> Result<()> {
        self.state = CrawlState::Advancing;
        match advance_step(driver, self.timeout) {
            Ok(()) => {
                self.state = CrawlState::PageLoaded;
                Ok(())
            }
            Err(e) => {
                self.state = CrawlState::Failed;
                Err(Error::from_navigation(e))
            }
        }
    }
}

fn advance_step(driver: &mut dyn PageDriver, timeout: Duration) -> DriverResult<()> {
    let next = driver.wait_for(Target::NextButton, WaitCond::Present, timeout)?;
    driver.scroll_into_view(&next)?;
    driver.click(&next)
}
