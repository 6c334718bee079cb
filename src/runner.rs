// src/runner.rs
use std::thread;

use crate::aggregate::Aggregator;
use crate::config::options::CrawlOptions;
use crate::driver::PageDriver;
use crate::error::{Error, Result};
use crate::page::{self, PageFailure};
use crate::paginate::Paginator;
use crate::progress::Progress;
use crate::record::RunResult;

/// Closes the session on every exit path, panics included.
struct SessionGuard<'d> {
    driver: &'d mut dyn PageDriver,
}

impl SessionGuard<'_> {
    fn driver(&mut self) -> &mut dyn PageDriver {
        &mut *self.driver
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.driver.close_session();
        logf!("driver closed :)");
    }
}

/// Crawl the portal listing for one address.
///
/// Mid-crawl failures never raise: whatever was aggregated up to the
/// failure comes back in the `RunResult`. The only `Err` is bad
/// configuration, rejected before the session is touched. Closing the
/// session early (or any fatal session error) just ends the run with
/// the partial result.
pub fn run(
    driver: &mut dyn PageDriver,
    address: &str,
    opts: &CrawlOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunResult> {
    opts.validate(address)?;

    let mut guard = SessionGuard { driver };
    let d = guard.driver();

    logf!("run start: address={address:?} radius={}m", opts.radius_m);

    // A failed search is reported but does not end the run; the page
    // loop below just finds nothing and stops.
    if let Err(e) = open_and_search(d, address, opts) {
        loge!("{e}");
        if let Some(p) = progress.as_deref_mut() {
            p.log("[Error] search failed. Something went wrong, try running the function again.");
        }
    }

    let mut agg = Aggregator::new();
    let mut pager = Paginator::new(opts.page_threshold, opts.wait_timeout);
    let mut page_no = 0usize;

    loop {
        page_no += 1;

        let count = match pager.count_entries(d) {
            Ok(c) => c,
            Err(e) => {
                report_error(&e, progress.as_deref_mut());
                break;
            }
        };
        agg.note_page();
        agg.note_entries(count);

        match page::collect_page(d, opts, progress.as_deref_mut()) {
            Ok(records) => agg.merge(records),
            Err(PageFailure { collected, source }) => {
                // Keep what the page yielded before it broke. A fatal
                // session error ends the run here; anything else gets
                // one advance attempt below.
                agg.merge(collected);
                report_error(&source, progress.as_deref_mut());
                if source.is_fatal() {
                    pager.fail();
                    break;
                }
            }
        }

        if let Some(p) = progress.as_deref_mut() {
            p.page_done(page_no, count);
        }
        logf!(
            "page {page_no}: {count} entries, {} unique so far",
            agg.unique_count()
        );

        if pager.should_stop(count) {
            pager.stop();
            logs!("reached final page after {page_no} pages");
            if let Some(p) = progress.as_deref_mut() {
                p.log("[Stop Condition] reached final page.");
            }
            break;
        }

        if let Err(e) = pager.advance(d) {
            report_error(&e, progress.as_deref_mut());
            break;
        }
        thread::sleep(opts.settle_pause);
    }

    let result = agg.into_result();
    logf!(
        "run done: {} pages, {} entries, {} unique",
        result.pages_visited,
        result.entries_visited,
        result.records.len()
    );
    if let Some(p) = progress.as_deref_mut() {
        p.log("[Info] complete. Summary:");
        p.log(&format!("[Info] Total Addresses looped: {}", result.entries_visited));
        p.log(&format!("[Info] Total Unique Results: {}", result.records.len()));
        p.finish();
    }

    Ok(result)
}

fn open_and_search(
    driver: &mut dyn PageDriver,
    address: &str,
    opts: &CrawlOptions,
) -> Result<()> {
    driver.load(&opts.portal_url).map_err(Error::Search)?;
    driver.search(address, opts.radius_m).map_err(Error::Search)?;
    logf!("search submitted: {address:?}");
    Ok(())
}

fn report_error(e: &Error, progress: Option<&mut (dyn Progress + '_)>) {
    loge!("{e}");
    if let Some(p) = progress {
        p.log(&format!("[Error] something went wrong. Exception: {e}"));
    }
}
