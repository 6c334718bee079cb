// src/extract.rs
//
// Turns the two free-text blocks of an opened detail view into a Record.
// Parsing is positional: the portal renders label lines at even indices
// and value lines at odd indices.

use std::time::Duration;

use crate::driver::{PageDriver, Target, WaitCond};
use crate::record::Record;

/// Normalize a block of text into comparable lines:
/// split on line breaks, trim, lowercase, drop empties.
pub fn tidy_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Build a Record from the raw block texts plus an already-captured link.
///
/// The two blocks fail independently, each all-or-nothing: a short
/// address block blanks address and ward; a description block with
/// fewer than 10 lines blanks all five description-derived fields.
/// Never errors; a malformed entry must not abort its page.
pub fn build_record(address_block: &str, description_block: &str, link: String) -> Record {
    let a = tidy_lines(address_block);
    let d = tidy_lines(description_block);

    let (address, ward) = match (a.first(), a.get(1)) {
        (Some(addr), Some(ward)) => (addr.clone(), ward.clone()),
        _ => (s!(), s!()),
    };

    // Values sit at odd indices: 1 number, 3 type, 5 date, 7 status, 9 description.
    let (application_number, application_type, date_submitted, status, description) =
        if d.len() >= 10 {
            (d[1].clone(), d[3].clone(), d[5].clone(), d[7].clone(), d[9].clone())
        } else {
            (s!(), s!(), s!(), s!(), s!())
        };

    Record {
        address,
        ward,
        application_number,
        application_type,
        date_submitted,
        status,
        description,
        link,
    }
}

/// Best-effort link capture from an opened detail view: expand the
/// link accordion, then trigger the copy control and read the result.
/// One attempt, no retry; any failure yields an empty link.
pub fn capture_link(driver: &mut dyn PageDriver, timeout: Duration) -> String {
    let grab = |driver: &mut dyn PageDriver| {
        let accordion = driver.wait_for(Target::LinkAccordion, WaitCond::Present, timeout)?;
        driver.scroll_into_view(&accordion)?;
        driver.click(&accordion)?;
        let button = driver.wait_for(Target::LinkCopyButton, WaitCond::Clickable, timeout)?;
        driver.copy_to_clipboard(&button)
    };
    match grab(driver) {
        Ok(link) => link,
        Err(e) => {
            loge!("link capture failed: {e}");
            s!()
        }
    }
}

/* ---------- tests ---------- */
