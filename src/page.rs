// src/page.rs
//
// Walks one results page: open each entry's detail view in document
// order, capture its blocks, close it again. Entries are re-enumerated
// before each open because closing a detail view invalidates handles
// on some backends.

use std::thread;

use crate::config::options::CrawlOptions;
use crate::driver::{DriverError, DriverResult, PageDriver, Target, WaitCond};
use crate::error::Error;
use crate::extract;
use crate::progress::Progress;
use crate::record::Record;

/// A page that could not be walked to the end. Whatever was captured
/// before the failure rides along so the caller can still keep it.
#[derive(Debug)]
pub struct PageFailure {
    pub collected: Vec<Record>,
    pub source: Error,
}

/// Capture every entry on the current page.
///
/// A field-level extraction problem never fails the page; the record
/// comes back null-filled and the fallback is reported through the
/// log and the progress sink. A navigation failure aborts the
/// remaining entries and returns the partial batch. Zero entries is a
/// valid page.
pub fn collect_page(
    driver: &mut dyn PageDriver,
    opts: &CrawlOptions,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<Vec<Record>, PageFailure> {
    let total = match driver.find_all(Target::EntryRow) {
        Ok(entries) => entries.len(),
        Err(e) => {
            return Err(PageFailure {
                collected: Vec::new(),
                source: Error::from_navigation(e),
            });
        }
    };

    let mut out: Vec<Record> = Vec::with_capacity(total);

    for i in 0..total {
        match capture_entry(driver, i, opts) {
            Ok(rec) => {
                // Tidied blocks never produce empty values, so an empty
                // address or number means that block fell back to null-fill.
                let null_filled = rec.address.is_empty() || rec.application_number.is_empty();
                if null_filled {
                    logf!("missing value, filling w/ null");
                }
                if let Some(p) = progress.as_deref_mut() {
                    p.log(&format!("Address instance: {}", rec.address));
                    if null_filled {
                        p.log("[Info] missing value, filling w/ null");
                    }
                    p.entry_done(i);
                }
                out.push(rec);
            }
            Err(e) => {
                return Err(PageFailure {
                    collected: out,
                    source: Error::from_navigation(e),
                });
            }
        }
        thread::sleep(opts.settle_pause);
    }

    Ok(out)
}

/// Open the i-th entry, read both blocks, capture the link, close.
fn capture_entry(
    driver: &mut dyn PageDriver,
    index: usize,
    opts: &CrawlOptions,
) -> DriverResult<Record> {
    let entries = driver.find_all(Target::EntryRow)?;
    let entry = entries.get(index).copied().ok_or_else(|| {
        DriverError::Interact(
            Target::EntryRow,
            format!("entry {index} missing after detail close"),
        )
    })?;

    driver.scroll_into_view(&entry)?;
    driver.click(&entry)?;

    let address = driver.wait_for(Target::AddressBlock, WaitCond::Visible, opts.wait_timeout)?;
    let address_text = driver.read_inner_text(&address)?;

    let desc = driver.wait_for(Target::DescriptionBlock, WaitCond::Present, opts.wait_timeout)?;
    driver.scroll_into_view(&desc)?;
    let desc_text = driver.read_inner_text(&desc)?;

    // Link first, close after: the copy controls live inside the
    // detail view and are gone once it closes.
    let link = extract::capture_link(driver, opts.wait_timeout);

    let close = driver.wait_for(Target::DetailClose, WaitCond::Present, opts.wait_timeout)?;
    driver.scroll_into_view(&close)?;
    driver.click(&close)?;

    Ok(extract::build_record(&address_text, &desc_text, link))
}
