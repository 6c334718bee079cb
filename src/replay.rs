// src/replay.rs
//
// In-memory page driver that plays back canned pages. Lets the CLI
// run a full crawl offline (--replay <file>) and gives tests a
// scriptable backend with fault injection.

use std::time::Duration;

use crate::driver::{DriverError, DriverResult, Handle, PageDriver, Target, WaitCond};
use crate::error::{Error, Result};

/// One canned entry: the two detail blocks plus an optional link.
/// `link: None` renders an application without a link section; the
/// accordion wait times out and the record's link stays empty.
#[derive(Debug, Clone, Default)]
pub struct ReplayEntry {
    pub address_block: String,
    pub description_block: String,
    pub link: Option<String>,
}

/// One canned results page.
#[derive(Debug, Clone, Default)]
pub struct ReplayPage {
    pub entries: Vec<ReplayEntry>,
}

/// Failure switches. Positions are 0-based (page, entry).
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// Reject the initial search call.
    pub fail_search: bool,
    /// Refuse the click that opens this entry's detail view.
    pub fail_open_at: Option<(usize, usize)>,
    /// Drop the whole session when this entry is opened.
    pub lose_session_at: Option<(usize, usize)>,
}

/// Call counters for post-run assertions.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    pub loads: usize,
    pub searches: usize,
    pub detail_opens: usize,
    pub advances: usize,
    pub closes: usize,
}

pub struct ReplayDriver {
    pages: Vec<ReplayPage>,
    pub faults: Faults,
    pub calls: CallLog,
    current: usize,
    searched: bool,
    open_entry: Option<usize>,
    accordion_open: bool,
    session_dead: bool,
    closed: bool,
}

impl ReplayDriver {
    pub fn new(pages: Vec<ReplayPage>) -> Self {
        Self {
            pages,
            faults: Faults::default(),
            calls: CallLog::default(),
            current: 0,
            searched: false,
            open_entry: None,
            accordion_open: false,
            session_dead: false,
            closed: false,
        }
    }

    /// Parse a plain-text fixture into a driver. Line-oriented:
    ///
    /// ```text
    /// # comment
    /// === page
    /// --- entry
    /// [address]
    /// 12 Elm Street
    /// Ward 4
    /// [description]
    /// APPLICATION NUMBER
    /// A0123/22
    /// ...
    /// [link] https://example.org/app/123
    /// ```
    pub fn from_fixture(text: &str) -> Result<Self> {
        enum Section {
            None,
            Address,
            Description,
        }

        let mut pages: Vec<ReplayPage> = Vec::new();
        let mut section = Section::None;

        for (n, raw) in text.lines().enumerate() {
            let line = raw.trim_end();
            let lineno = n + 1;

            if line.starts_with('#') {
                continue;
            }
            match line.trim() {
                "" => continue,
                "=== page" => {
                    pages.push(ReplayPage::default());
                    section = Section::None;
                    continue;
                }
                "--- entry" => {
                    let page = pages.last_mut().ok_or_else(|| {
                        Error::Config(format!("fixture line {lineno}: entry before any page"))
                    })?;
                    page.entries.push(ReplayEntry::default());
                    section = Section::None;
                    continue;
                }
                "[address]" => {
                    section = Section::Address;
                    continue;
                }
                "[description]" => {
                    section = Section::Description;
                    continue;
                }
                _ => {}
            }

            let entry = pages
                .last_mut()
                .and_then(|p| p.entries.last_mut())
                .ok_or_else(|| {
                    Error::Config(format!("fixture line {lineno}: text outside an entry"))
                })?;

            if let Some(url) = line.trim().strip_prefix("[link]") {
                entry.link = Some(s!(url.trim()));
                continue;
            }

            let block = match section {
                Section::Address => &mut entry.address_block,
                Section::Description => &mut entry.description_block,
                Section::None => {
                    return Err(Error::Config(format!(
                        "fixture line {lineno}: text before a section marker"
                    )));
                }
            };
            if !block.is_empty() {
                block.push('\n');
            }
            block.push_str(line);
        }

        Ok(Self::new(pages))
    }

    pub fn was_closed(&self) -> bool {
        self.closed
    }

    fn check_session(&self) -> DriverResult<()> {
        if self.session_dead {
            return Err(DriverError::SessionLost(s!("session closed")));
        }
        Ok(())
    }

    fn page(&self) -> &ReplayPage {
        static EMPTY: ReplayPage = ReplayPage { entries: Vec::new() };
        self.pages.get(self.current).unwrap_or(&EMPTY)
    }

    fn opened(&self) -> DriverResult<&ReplayEntry> {
        let i = self
            .open_entry
            .ok_or_else(|| DriverError::Interact(Target::AddressBlock, s!("no detail open")))?;
        self.page()
            .entries
            .get(i)
            .ok_or_else(|| DriverError::Interact(Target::EntryRow, s!("stale entry handle")))
    }
}

impl PageDriver for ReplayDriver {
    fn load(&mut self, _url: &str) -> DriverResult<()> {
        self.check_session()?;
        self.calls.loads += 1;
        Ok(())
    }

    fn search(&mut self, _address: &str, _radius_m: u32) -> DriverResult<()> {
        self.check_session()?;
        self.calls.searches += 1;
        if self.faults.fail_search {
            return Err(DriverError::Interact(Target::SearchForm, s!("search rejected")));
        }
        self.searched = true;
        Ok(())
    }

    fn wait_for(
        &mut self,
        target: Target,
        _cond: WaitCond,
        _timeout: Duration,
    ) -> DriverResult<Handle> {
        self.check_session()?;
        let ok = Handle { id: 0, target };
        match target {
            Target::SearchForm => Ok(ok),
            Target::EntryRow => {
                if self.page().entries.is_empty() {
                    Err(DriverError::WaitTimeout(target))
                } else {
                    Ok(Handle { id: 0, target })
                }
            }
            Target::AddressBlock | Target::DescriptionBlock | Target::DetailClose => {
                if self.open_entry.is_some() {
                    Ok(ok)
                } else {
                    Err(DriverError::WaitTimeout(target))
                }
            }
            Target::LinkAccordion => {
                if self.opened()?.link.is_some() {
                    Ok(ok)
                } else {
                    Err(DriverError::WaitTimeout(target))
                }
            }
            Target::LinkCopyButton => {
                if self.accordion_open {
                    Ok(ok)
                } else {
                    Err(DriverError::WaitTimeout(target))
                }
            }
            Target::NextButton => {
                if self.current + 1 < self.pages.len() {
                    Ok(ok)
                } else {
                    Err(DriverError::WaitTimeout(target))
                }
            }
        }
    }

    fn find_all(&mut self, target: Target) -> DriverResult<Vec<Handle>> {
        self.check_session()?;
        // Without a completed search the portal shows no results table.
        if target != Target::EntryRow || !self.searched {
            return Ok(Vec::new());
        }
        Ok((0..self.page().entries.len())
            .map(|i| Handle { id: i as u64, target })
            .collect())
    }

    fn click(&mut self, handle: &Handle) -> DriverResult<()> {
        self.check_session()?;
        match handle.target {
            Target::EntryRow => {
                let here = (self.current, handle.id as usize);
                if self.faults.lose_session_at == Some(here) {
                    self.session_dead = true;
                    return Err(DriverError::SessionLost(s!("driver crashed")));
                }
                if self.faults.fail_open_at == Some(here) {
                    return Err(DriverError::Interact(
                        Target::EntryRow,
                        s!("click intercepted"),
                    ));
                }
                self.open_entry = Some(handle.id as usize);
                self.calls.detail_opens += 1;
                Ok(())
            }
            Target::DetailClose => {
                self.open_entry = None;
                self.accordion_open = false;
                Ok(())
            }
            Target::LinkAccordion => {
                self.accordion_open = true;
                Ok(())
            }
            Target::NextButton => {
                if self.current + 1 >= self.pages.len() {
                    return Err(DriverError::Interact(
                        Target::NextButton,
                        s!("no further page"),
                    ));
                }
                self.current += 1;
                self.open_entry = None;
                self.accordion_open = false;
                self.calls.advances += 1;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn scroll_into_view(&mut self, _handle: &Handle) -> DriverResult<()> {
        self.check_session()
    }

    fn read_inner_text(&mut self, handle: &Handle) -> DriverResult<String> {
        self.check_session()?;
        match handle.target {
            Target::AddressBlock => Ok(self.opened()?.address_block.clone()),
            Target::DescriptionBlock => Ok(self.opened()?.description_block.clone()),
            other => Err(DriverError::Interact(other, s!("no text to read"))),
        }
    }

    fn copy_to_clipboard(&mut self, handle: &Handle) -> DriverResult<String> {
        self.check_session()?;
        if handle.target != Target::LinkCopyButton || !self.accordion_open {
            return Err(DriverError::Interact(
                Target::LinkCopyButton,
                s!("copy control not visible"),
            ));
        }
        match &self.opened()?.link {
            Some(url) => Ok(url.clone()),
            None => Err(DriverError::Interact(
                Target::LinkCopyButton,
                s!("clipboard empty"),
            )),
        }
    }

    fn close_session(&mut self) {
        self.closed = true;
        self.session_dead = true;
        self.calls.closes += 1;
    }
}

/* ---------- tests ---------- */
