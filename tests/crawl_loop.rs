// tests/crawl_loop.rs
//
// Whole-run behavior through the replay driver: stop condition,
// cross-page dedup, partial results on failure, session teardown.
//
use std::time::Duration;

use coa_scrape::config::options::CrawlOptions;
use coa_scrape::error::Error;
use coa_scrape::progress::Progress;
use coa_scrape::record::RunResult;
use coa_scrape::replay::{ReplayDriver, ReplayEntry, ReplayPage};
use coa_scrape::runner;

fn entry(n: usize) -> ReplayEntry {
    ReplayEntry {
        address_block: format!("{n} Elm Street\nWard 4 - Etobicoke"),
        description_block: format!(
            "APPLICATION NUMBER\nA{n:04}/22\nAPPLICATION TYPE\nMinor Variance\nDATE SUBMITTED\n2022-01-01\nSTATUS\nIn Review\nDESCRIPTION\nPorch repair at {n}"
        ),
        link: Some(format!("https://example.org/app/{n}")),
    }
}

fn page(range: std::ops::Range<usize>) -> ReplayPage {
    ReplayPage { entries: range.map(entry).collect() }
}

fn opts() -> CrawlOptions {
    CrawlOptions {
        wait_timeout: Duration::from_millis(10),
        settle_pause: Duration::ZERO,
        ..CrawlOptions::default()
    }
}

fn crawl(driver: &mut ReplayDriver) -> RunResult {
    runner::run(driver, "12 Elm Street", &opts(), None).unwrap()
}

#[derive(Default)]
struct RecordingProgress {
    lines: Vec<String>,
    pages: Vec<(usize, usize)>,
    finished: bool,
}

impl Progress for RecordingProgress {
    fn log(&mut self, msg: &str) {
        self.lines.push(msg.to_string());
    }
    fn page_done(&mut self, page: usize, entries: usize) {
        self.pages.push((page, entries));
    }
    fn finish(&mut self) {
        self.finished = true;
    }
}

#[test]
fn short_first_page_stops_after_one_page() {
    let mut d = ReplayDriver::new(vec![page(0..4)]);
    let out = crawl(&mut d);

    assert_eq!(out.records.len(), 4);
    assert_eq!(out.pages_visited, 1);
    assert_eq!(out.entries_visited, 4);
    assert_eq!(d.calls.advances, 0);
    assert!(d.was_closed());

    // Captured fields are normalized lowercase.
    assert_eq!(out.records[0].address, "0 elm street");
    assert_eq!(out.records[0].application_number, "a0000/22");
    assert_eq!(out.records[0].link, "https://example.org/app/0");
}

#[test]
fn page_at_the_threshold_counts_as_final() {
    let mut d = ReplayDriver::new(vec![page(0..10), page(10..14)]);
    let out = crawl(&mut d);

    assert_eq!(out.pages_visited, 1);
    assert_eq!(out.records.len(), 10);
    assert_eq!(d.calls.advances, 0);
}

#[test]
fn full_page_continues_then_short_page_stops() {
    let mut d = ReplayDriver::new(vec![page(0..12), page(12..16)]);
    let out = crawl(&mut d);

    assert_eq!(out.pages_visited, 2);
    assert_eq!(out.entries_visited, 16);
    assert_eq!(out.records.len(), 16);
    assert_eq!(d.calls.advances, 1);
    assert!(d.was_closed());
}

#[test]
fn duplicates_across_pages_are_dropped() {
    // Second page re-serves entries 8..12 before one new entry.
    let second = ReplayPage { entries: (8..13).map(entry).collect() };
    let mut d = ReplayDriver::new(vec![page(0..12), second]);
    let out = crawl(&mut d);

    assert_eq!(out.pages_visited, 2);
    assert_eq!(out.entries_visited, 17);
    assert_eq!(out.records.len(), 13);
}

#[test]
fn zero_entry_listing_is_a_valid_run() {
    let mut d = ReplayDriver::new(vec![ReplayPage::default()]);
    let out = crawl(&mut d);

    assert_eq!(out.records.len(), 0);
    assert_eq!(out.entries_visited, 0);
    assert_eq!(out.pages_visited, 1);
    assert!(d.was_closed());
}

#[test]
fn failed_search_still_returns_a_result() {
    let mut d = ReplayDriver::new(vec![page(0..12)]);
    d.faults.fail_search = true;

    let mut prog = RecordingProgress::default();
    let out = runner::run(&mut d, "12 Elm Street", &opts(), Some(&mut prog)).unwrap();

    assert_eq!(out.records.len(), 0);
    assert!(d.was_closed());
    assert!(prog.lines.iter().any(|l| {
        l == "[Error] search failed. Something went wrong, try running the function again."
    }));
}

#[test]
fn entry_failure_keeps_page_partials_and_advances() {
    let mut d = ReplayDriver::new(vec![page(0..12), page(12..16)]);
    d.faults.fail_open_at = Some((0, 7));
    let out = crawl(&mut d);

    // Seven records survive from the broken page, all four from the next.
    assert_eq!(out.records.len(), 11);
    assert_eq!(out.pages_visited, 2);
    assert_eq!(out.entries_visited, 16);
    assert_eq!(d.calls.advances, 1);
    assert!(d.was_closed());
}

#[test]
fn lost_session_stops_immediately_with_partials() {
    let mut d = ReplayDriver::new(vec![page(0..12), page(12..16)]);
    d.faults.lose_session_at = Some((0, 5));
    let out = crawl(&mut d);

    assert_eq!(out.records.len(), 5);
    assert_eq!(out.pages_visited, 1);
    assert_eq!(out.entries_visited, 12);
    assert_eq!(d.calls.advances, 0);
    assert!(d.was_closed());
}

#[test]
fn advance_failure_after_a_full_page_keeps_everything() {
    // Twelve entries but no second page to move to.
    let mut d = ReplayDriver::new(vec![page(0..12)]);
    let out = crawl(&mut d);

    assert_eq!(out.records.len(), 12);
    assert_eq!(out.pages_visited, 1);
    assert_eq!(out.entries_visited, 12);
    assert!(d.was_closed());
}

#[test]
fn missing_link_blanks_only_the_link_field() {
    let mut no_link = entry(0);
    no_link.link = None;
    let mut d = ReplayDriver::new(vec![ReplayPage { entries: vec![no_link] }]);
    let out = crawl(&mut d);

    assert_eq!(out.records.len(), 1);
    assert_eq!(out.records[0].link, "");
    assert_eq!(out.records[0].application_number, "a0000/22");
}

#[test]
fn bad_config_is_rejected_before_the_session_opens() {
    let mut d = ReplayDriver::new(vec![page(0..4)]);
    let err = runner::run(&mut d, "  ", &opts(), None).unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert_eq!(d.calls.loads, 0);
    assert!(!d.was_closed());
}

#[test]
fn progress_lines_match_the_run_log() {
    let mut d = ReplayDriver::new(vec![page(0..12), page(12..16)]);
    let mut prog = RecordingProgress::default();
    runner::run(&mut d, "12 Elm Street", &opts(), Some(&mut prog)).unwrap();

    assert_eq!(prog.pages, vec![(1, 12), (2, 4)]);
    assert!(prog.finished);
    assert!(prog.lines.contains(&"Address instance: 0 elm street".to_string()));
    assert!(prog.lines.contains(&"[Stop Condition] reached final page.".to_string()));
    assert!(prog.lines.contains(&"[Info] complete. Summary:".to_string()));
    assert!(prog.lines.contains(&"[Info] Total Addresses looped: 16".to_string()));
    assert!(prog.lines.contains(&"[Info] Total Unique Results: 16".to_string()));
}

#[test]
fn failure_lines_are_tagged_as_errors() {
    let mut d = ReplayDriver::new(vec![page(0..12), page(12..16)]);
    d.faults.fail_open_at = Some((0, 3));
    let mut prog = RecordingProgress::default();
    runner::run(&mut d, "12 Elm Street", &opts(), Some(&mut prog)).unwrap();

    assert!(prog.lines.iter().any(|l| {
        l.starts_with("[Error] something went wrong. Exception: ")
    }));
}

#[test]
fn short_description_is_null_filled_and_reported() {
    let mut broken = entry(1);
    broken.description_block = "APPLICATION NUMBER\nA0001/22\nAPPLICATION TYPE".into();
    let mut d = ReplayDriver::new(vec![ReplayPage { entries: vec![entry(0), broken] }]);

    let mut prog = RecordingProgress::default();
    let out = runner::run(&mut d, "12 Elm Street", &opts(), Some(&mut prog)).unwrap();

    // The entry is kept, its description-derived fields blanked.
    assert_eq!(out.records.len(), 2);
    assert_eq!(out.records[1].address, "1 elm street");
    assert_eq!(out.records[1].application_number, "");
    assert_eq!(out.records[1].status, "");

    // One notice for the one malformed entry, after its address echo.
    let notice = "[Info] missing value, filling w/ null".to_string();
    assert_eq!(prog.lines.iter().filter(|l| **l == notice).count(), 1);
    let echo = prog.lines.iter().position(|l| l == "Address instance: 1 elm street");
    assert!(echo.unwrap() < prog.lines.iter().position(|l| *l == notice).unwrap());
}

#[test]
fn short_address_block_is_reported_as_missing() {
    let mut broken = entry(0);
    broken.address_block = "12 Elm Street".into();
    let mut d = ReplayDriver::new(vec![ReplayPage { entries: vec![broken] }]);

    let mut prog = RecordingProgress::default();
    let out = runner::run(&mut d, "12 Elm Street", &opts(), Some(&mut prog)).unwrap();

    assert_eq!(out.records.len(), 1);
    assert_eq!(out.records[0].address, "");
    assert_eq!(out.records[0].ward, "");
    assert_eq!(out.records[0].application_number, "a0000/22");
    assert!(prog.lines.contains(&"[Info] missing value, filling w/ null".to_string()));
}

#[test]
fn progress_reporting_keeps_working_across_pages_and_failures() {
    // Three pages with an entry failure in the middle one, so every
    // reporting path (page lines, entry echoes, error report, stop
    // line, summary) fires through one sink in one run.
    let mut d = ReplayDriver::new(vec![page(0..12), page(12..24), page(24..28)]);
    d.faults.fail_open_at = Some((1, 5));
    let mut prog = RecordingProgress::default();
    let out = runner::run(&mut d, "12 Elm Street", &opts(), Some(&mut prog)).unwrap();

    assert_eq!(out.pages_visited, 3);
    assert_eq!(out.entries_visited, 28);
    assert_eq!(out.records.len(), 21);
    assert_eq!(d.calls.advances, 2);

    assert_eq!(prog.pages, vec![(1, 12), (2, 12), (3, 4)]);
    assert_eq!(
        prog.lines.iter().filter(|l| l.starts_with("Address instance: ")).count(),
        21
    );
    assert!(prog.lines.iter().any(|l| {
        l.starts_with("[Error] something went wrong. Exception: ")
    }));
    assert!(prog.lines.contains(&"[Stop Condition] reached final page.".to_string()));
    assert!(prog.lines.contains(&"[Info] Total Unique Results: 21".to_string()));
    assert!(prog.finished);
}
