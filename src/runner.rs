// src/runner.rs
use std::path::PathBuf;

use tracing::{debug, info};

use crate::{
    config::options::{AppOptions, FetchOptions},
    core::net::FacilityClient,
    error::Result,
    file::export_records,
    progress::Progress,
    record::FacilityRecord,
    specs::facilities,
};

/// Summary of what was produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub records: Vec<FacilityRecord>,
    /// Fragments without a name or identifier.
    pub dropped: usize,
    /// Records removed by `match_name`.
    pub filtered: usize,
    pub files_written: Vec<PathBuf>,
}

/// Fetch and extract, no export. Records are in page order.
pub fn search(fetch: &FetchOptions, query: &str) -> Result<Vec<FacilityRecord>> {
    let client = FacilityClient::new(fetch.clone())?;
    let body = client.fetch(query)?;
    Ok(facilities::extract(&body)?.collect())
}

/// Top-level runner: fetch → extract → (filter) → export.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(opts: &AppOptions, progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
    let client = FacilityClient::new(opts.fetch.clone())?;
    run_with(&client, opts, progress)
}

pub fn run_with(
    client: &FacilityClient,
    opts: &AppOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Searching for \"{}\"…", opts.query.trim()));
    }
    let body = client.fetch(&opts.query)?;

    if let Some(p) = progress.as_deref_mut() {
        p.log("Parsing results…");
    }
    let mut it = facilities::extract(&body)?;
    let mut records: Vec<FacilityRecord> = it.by_ref().collect();
    let dropped = it.dropped();

    let filtered = if opts.match_name {
        let before = records.len();
        retain_matching(&mut records, &opts.query);
        before - records.len()
    } else {
        0
    };
    if filtered > 0 {
        debug!(filtered, "records removed by name filter");
    }

    if let Some(p) = progress.as_deref_mut() {
        p.records_found(records.len(), dropped + filtered);
    }
    info!(records = records.len(), dropped, filtered, "extraction done");

    let files_written = export_records(&opts.export, &records)?;
    if let Some(p) = progress.as_deref_mut() {
        for f in &files_written {
            p.file_written(f);
        }
        p.finish();
    }

    Ok(RunSummary { records, dropped, filtered, files_written })
}

/// Keep records whose name contains `query`, case-insensitively.
pub fn retain_matching(records: &mut Vec<FacilityRecord>, query: &str) {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return;
    }
    records.retain(|r| r.name.to_lowercase().contains(&needle));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(n: &str) -> FacilityRecord {
        FacilityRecord { name: s!(n), ahca_number: Some(s!("1")), ..Default::default() }
    }

    #[test]
    fn name_filter_is_case_insensitive_and_keeps_order() {
        let mut v = vec![named("Tampa General Hospital"), named("Bayfront"), named("TAMPA Clinic")];
        retain_matching(&mut v, " tampa ");
        let names: Vec<_> = v.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Tampa General Hospital", "TAMPA Clinic"]);
    }
}
