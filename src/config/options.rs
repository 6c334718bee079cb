// src/config/options.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::consts::*;
use crate::csv::Delim;
use crate::error::{Error, Result};

/// Knobs for one crawl run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrawlOptions {
    pub portal_url: String,
    pub radius_m: u32,
    pub page_threshold: usize,
    pub wait_timeout: Duration,
    pub settle_pause: Duration,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            portal_url: s!(PORTAL_URL),
            radius_m: DEFAULT_RADIUS_M,
            page_threshold: PAGE_THRESHOLD,
            wait_timeout: Duration::from_secs(WAIT_TIMEOUT_SECS),
            settle_pause: Duration::from_millis(SETTLE_PAUSE_MS),
        }
    }
}

impl CrawlOptions {
    /// Caller-supplied configuration is the only thing `runner::run`
    /// raises for; everything checked here.
    pub fn validate(&self, address: &str) -> Result<()> {
        if address.trim().is_empty() {
            return Err(Error::Config(s!("address must not be empty")));
        }
        if self.portal_url.trim().is_empty() {
            return Err(Error::Config(s!("portal url must not be empty")));
        }
        if self.wait_timeout.is_zero() {
            return Err(Error::Config(s!("wait timeout must be positive")));
        }
        Ok(())
    }
}

/// Where and how results land on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub dir: PathBuf,
    pub file_stem: String,
    pub format: Delim,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: s!(DEFAULT_OUT_FILE),
            format: Delim::Csv,
        }
    }
}

impl ExportOptions {
    pub fn out_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.file_stem, self.format.ext()))
    }

    /// Parse CLI text into dir + stem. A pasted extension is ignored;
    /// the format controls it.
    pub fn set_path(&mut self, text: &str) {
        let p = Path::new(text.trim());
        match p.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.dir = parent.to_path_buf(),
            _ => self.dir = PathBuf::from("."),
        }
        if let Some(stem) = p.file_stem() {
            self.file_stem = stem.to_string_lossy().into_owned();
        }
    }
}
