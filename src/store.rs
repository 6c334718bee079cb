// src/store.rs
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::options::ExportOptions;
use crate::csv::write_row;
use crate::error::Result;
use crate::record::{COLUMNS, Record};

/// Append records to the export file; the header row is written only
/// when the file does not exist yet. Repeated runs accumulate rows,
/// they never overwrite. Returns the path written to.
pub fn append_records(export: &ExportOptions, records: &[Record]) -> Result<PathBuf> {
    let path = export.out_path();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let fresh = !path.exists();
    let sep = export.format.delim();

    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let mut out = BufWriter::new(file);

    if fresh {
        let header: Vec<String> = COLUMNS.iter().map(|c| s!(*c)).collect();
        write_row(&mut out, &header, sep)?;
    }
    for rec in records {
        write_row(&mut out, &rec.to_row(), sep)?;
    }
    out.flush()?;

    Ok(path)
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::other(format!(
            "path exists but is not a directory: {}",
            dir.display()
        ))
        .into());
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
