// src/driver.rs
use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Page elements the crawl needs, named by role.
/// A driver maps each role to whatever selector its backend uses;
/// the crawl itself never sees ids, classes or XPath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Search controls on the portal entry page.
    SearchForm,
    /// One clickable result entry in the listing table.
    EntryRow,
    /// Address block inside an opened detail view.
    AddressBlock,
    /// Description block inside an opened detail view.
    DescriptionBlock,
    /// Control that closes the detail view.
    DetailClose,
    /// Accordion that reveals the application link controls.
    LinkAccordion,
    /// Control that copies the application link.
    LinkCopyButton,
    /// Pagination "next" control.
    NextButton,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Target::SearchForm => "search form",
            Target::EntryRow => "result entry",
            Target::AddressBlock => "address block",
            Target::DescriptionBlock => "description block",
            Target::DetailClose => "detail close control",
            Target::LinkAccordion => "link accordion",
            Target::LinkCopyButton => "link copy control",
            Target::NextButton => "next page control",
        };
        f.write_str(name)
    }
}

/// Wait conditions for `wait_for`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCond {
    Present,
    Visible,
    Clickable,
}

/// Opaque reference to a live page element. Only meaningful to the
/// driver that minted it; carries its role for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    pub id: u64,
    pub target: Target,
}

/// What a page driver can report when an operation fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// A wait gave up before its condition was met.
    #[error("timed out waiting for {0}")]
    WaitTimeout(Target),

    /// An element was found but could not be acted on.
    #[error("could not interact with {0}: {1}")]
    Interact(Target, String),

    /// The underlying session is gone; no further call can succeed.
    #[error("session lost: {0}")]
    SessionLost(String),
}

impl DriverError {
    /// Fatal errors end the run; everything else is page-level.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DriverError::SessionLost(_))
    }
}

pub type DriverResult<T> = Result<T, DriverError>;

/// Capability surface the crawl requires from a page backend.
///
/// Implementations own the session and all selector knowledge.
/// Every method blocks until done or failed; `wait_for` blocks at
/// most `timeout`. Object-safe: the crawl takes `&mut dyn PageDriver`.
pub trait PageDriver {
    /// Navigate the session to the portal entry page.
    fn load(&mut self, url: &str) -> DriverResult<()>;

    /// Run the address search with the given radius in meters.
    fn search(&mut self, address: &str, radius_m: u32) -> DriverResult<()>;

    /// Block until `target` satisfies `cond`, or time out.
    fn wait_for(&mut self, target: Target, cond: WaitCond, timeout: Duration) -> DriverResult<Handle>;

    /// All current elements for `target`, in document order.
    /// An empty page yields an empty vec, not an error.
    fn find_all(&mut self, target: Target) -> DriverResult<Vec<Handle>>;

    fn click(&mut self, handle: &Handle) -> DriverResult<()>;

    fn scroll_into_view(&mut self, handle: &Handle) -> DriverResult<()>;

    /// Visible text of the element, markers and line breaks preserved.
    fn read_inner_text(&mut self, handle: &Handle) -> DriverResult<String>;

    /// Trigger the element's copy action and return the copied text.
    fn copy_to_clipboard(&mut self, handle: &Handle) -> DriverResult<String>;

    /// Tear the session down. Must be safe to call more than once;
    /// errors here are the driver's to swallow.
    fn close_session(&mut self);
}
