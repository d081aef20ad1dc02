// src/csv.rs
//! Tabular (CSV/TSV) encoding of facility records.
//!
//! Every file starts with the `record::COLUMNS` header, even when there are
//! no records, so an empty result is still a well-formed table.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use ::csv::{ReaderBuilder, WriterBuilder};

use crate::error::{Result, ScrapeError};
use crate::record::{COLUMNS, FacilityRecord, FacilityRow};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delim {
    Csv,
    Tsv,
}

impl Delim {
    pub fn byte(&self) -> u8 {
        match self {
            Delim::Csv => b',',
            Delim::Tsv => b'\t',
        }
    }
}

/* ---------------- Writing ---------------- */

pub fn write_records<W: Write>(w: W, records: &[FacilityRecord], delim: Delim) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delim.byte())
        .has_headers(false) // header written explicitly so empty exports get one
        .from_writer(w);
    wtr.write_record(COLUMNS)?;
    for r in records {
        wtr.serialize(FacilityRow::from(r))?;
    }
    wtr.flush().map_err(|e| ScrapeError::Export(e.to_string()))?;
    Ok(())
}

pub fn write_records_to_path(path: &Path, records: &[FacilityRecord], delim: Delim) -> Result<()> {
    let file = File::create(path).map_err(|e| ScrapeError::io(path, e))?;
    write_records(BufWriter::new(file), records, delim)
}

pub fn to_export_string(records: &[FacilityRecord], delim: Delim) -> Result<String> {
    let mut buf = Vec::new();
    write_records(&mut buf, records, delim)?;
    String::from_utf8(buf).map_err(|e| ScrapeError::Export(e.to_string()))
}

/* ---------------- Reading ---------------- */

/// Read a table written by `write_records` back into records.
pub fn read_records<R: Read>(r: R, delim: Delim) -> Result<Vec<FacilityRecord>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delim.byte())
        .has_headers(true)
        .from_reader(r);

    let headers = rdr.headers()?.clone();
    if headers.iter().ne(COLUMNS.iter().copied()) {
        return Err(ScrapeError::Export(format!(
            "unexpected header: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    rdr.deserialize::<FacilityRow>()
        .map(|row| row.map(FacilityRecord::from).map_err(ScrapeError::from))
        .collect()
}

pub fn read_records_from_path(path: &Path, delim: Delim) -> Result<Vec<FacilityRecord>> {
    let file = File::open(path).map_err(|e| ScrapeError::io(path, e))?;
    read_records(BufReader::new(file), delim)
}
