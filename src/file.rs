// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::Local;
use tracing::info;

use crate::config::consts::STAMP_FORMAT;
use crate::config::options::{ExportFormat, ExportOptions};
use crate::csv::write_records_to_path;
use crate::error::{Result, ScrapeError};
use crate::record::FacilityRecord;

/// Write every requested export. All default file names in one call share a
/// timestamp. Returns the paths written, in target order.
pub fn export_records(export: &ExportOptions, records: &[FacilityRecord]) -> Result<Vec<PathBuf>> {
    let stamp = Local::now().format(STAMP_FORMAT).to_string();
    export_records_stamped(export, records, &stamp)
}

pub fn export_records_stamped(
    export: &ExportOptions,
    records: &[FacilityRecord],
    stamp: &str,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(export.targets.len());
    for target in &export.targets {
        let path = export.out_path(target, stamp);
        write_export(&path, target.format, records)?;
        info!(path = %path.display(), records = records.len(), "export written");
        written.push(path);
    }
    Ok(written)
}

/// Write one file in the given format, creating parent directories.
pub fn write_export(path: &Path, format: ExportFormat, records: &[FacilityRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    match format.delimiter() {
        Some(delim) => write_records_to_path(path, records, delim),
        None => write_json(path, records),
    }
}

pub fn write_json(path: &Path, records: &[FacilityRecord]) -> Result<()> {
    let file = File::create(path).map_err(|e| ScrapeError::io(path, e))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, records)?;
    out.write_all(b"\n").map_err(|e| ScrapeError::io(path, e))?;
    out.flush().map_err(|e| ScrapeError::io(path, e))?;
    Ok(())
}

pub fn read_json(path: &Path) -> Result<Vec<FacilityRecord>> {
    let text = fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(ScrapeError::Export(format!(
            "path exists but is not a directory: {}",
            dir.display()
        )));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| ScrapeError::io(dir, e))?;
    }
    Ok(())
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}
