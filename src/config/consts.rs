// src/config/consts.rs

// Portal
pub const PORTAL_URL: &str = "https://secure.toronto.ca/AIC/index.do";

// Search
pub const DEFAULT_RADIUS_M: u32 = 1000;

// Pagination
// Observed page size of the results table; a page at or under this
// count is treated as the final page.
pub const PAGE_THRESHOLD: usize = 10;

// Waits
pub const WAIT_TIMEOUT_SECS: u64 = 20;
pub const SETTLE_PAUSE_MS: u64 = 500; // be polite

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_OUT_FILE: &str = "applications";
