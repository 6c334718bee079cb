// src/cli.rs
use std::{env, fs, path::PathBuf};

use crate::config::options::{CrawlOptions, ExportOptions};
use crate::csv::Delim;
use crate::error::{Error, Result};
use crate::progress::Progress;
use crate::replay::ReplayDriver;
use crate::{runner, store};

pub struct Params {
    pub address: String,
    pub replay: Option<PathBuf>,
    pub crawl: CrawlOptions,
    pub export: ExportOptions,
    pub quiet: bool,
}

impl Params {
    pub fn new() -> Self {
        Self {
            address: s!(),
            replay: None,
            crawl: CrawlOptions::default(),
            export: ExportOptions::default(),
            quiet: false,
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints progress lines the way the run log reads them.
struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }
    fn page_done(&mut self, page: usize, entries: usize) {
        println!("Page: {page}, Results: {entries}");
    }
}

pub fn run() -> Result<()> {
    let params = parse_cli()?;

    // The crate ships no live portal backend; a crawl needs a canned
    // session to play back.
    let Some(fixture) = &params.replay else {
        return Err(Error::Config(s!(
            "no page driver available; pass --replay <file> (see --help)"
        )));
    };
    let text = fs::read_to_string(fixture)?;
    let mut driver = ReplayDriver::from_fixture(&text)?;

    let mut console = ConsoleProgress;
    let progress: Option<&mut dyn Progress> =
        if params.quiet { None } else { Some(&mut console) };

    let result = runner::run(&mut driver, &params.address, &params.crawl, progress)?;

    let path = store::append_records(&params.export, &result.records)?;
    if !params.quiet {
        println!("[Info] printing to {}", path.display());
    }
    Ok(())
}

fn parse_cli() -> Result<Params> {
    let mut params = Params::new();
    let mut positional: Vec<String> = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--replay" => {
                params.replay = Some(PathBuf::from(need(&mut args, "--replay")?));
            }
            "--url" => params.crawl.portal_url = need(&mut args, "--url")?,
            "--radius" => {
                params.crawl.radius_m = parse_num(&need(&mut args, "--radius")?, "--radius")?;
            }
            "--threshold" => {
                params.crawl.page_threshold =
                    parse_num(&need(&mut args, "--threshold")?, "--threshold")?;
            }
            "--timeout" => {
                let secs: u64 = parse_num(&need(&mut args, "--timeout")?, "--timeout")?;
                params.crawl.wait_timeout = std::time::Duration::from_secs(secs);
            }
            "--pause" => {
                let ms: u64 = parse_num(&need(&mut args, "--pause")?, "--pause")?;
                params.crawl.settle_pause = std::time::Duration::from_millis(ms);
            }
            "-o" | "--out" => params.export.set_path(&need(&mut args, "--out")?),
            "--format" => {
                let v = need(&mut args, "--format")?;
                params.export.format = match v.to_ascii_lowercase().as_str() {
                    "csv" => Delim::Csv,
                    "tsv" => Delim::Tsv,
                    other => return Err(Error::Config(format!("unknown format: {other}"))),
                };
            }
            "-q" | "--quiet" => params.quiet = true,
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => {
                return Err(Error::Config(format!("unknown arg: {flag}")));
            }
            _ => positional.push(a),
        }
    }

    if positional.is_empty() {
        return Err(Error::Config(s!("address required (see --help)")));
    }
    params.address = positional.join(" ");

    Ok(params)
}

fn need(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| Error::Config(format!("missing value for {flag}")))
}

fn parse_num<T: std::str::FromStr>(v: &str, flag: &str) -> Result<T> {
    v.parse()
        .map_err(|_| Error::Config(format!("invalid value for {flag}: {v}")))
}
