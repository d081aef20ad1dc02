// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use super::consts::*;
use crate::csv::Delim;
use crate::error::{Result, ScrapeError};
use crate::file::looks_like_dir_hint;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppOptions {
    /// Facility name to search for.
    pub query: String,
    pub fetch: FetchOptions,
    pub export: ExportOptions,
    /// Keep only records whose name contains the query (case-insensitive).
    pub match_name: bool,
}

impl AppOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            fetch: FetchOptions::default(),
            export: ExportOptions::default(),
            match_name: false,
        }
    }
}

/// Everything the fetcher needs; handed to `FacilityClient::new` by value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    pub base_url: String,
    pub search_path: String,
    pub timeout: Duration,
    pub retries: u32,
    pub backoff: Duration,
    pub user_agent: String,
    /// `FacilityTypeSelection` form value.
    pub facility_type: String,
    /// `OpenClosed_LicenseStatus` form value.
    pub license_status: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            base_url: s!(BASE_URL),
            search_path: s!(SEARCH_PATH),
            timeout: Duration::from_secs(TIMEOUT_SECS),
            retries: RETRIES,
            backoff: Duration::from_millis(BACKOFF_MS),
            user_agent: s!(USER_AGENT),
            facility_type: s!(DEFAULT_FACILITY_TYPE),
            license_status: s!(DEFAULT_LICENSE_STATUS),
        }
    }
}

impl FetchOptions {
    /// A zero timeout would fail every request as a transport error.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(ScrapeError::Config(s!("timeout must be greater than zero")));
        }
        Ok(())
    }

    pub fn search_url(&self) -> String {
        join!(
            self.base_url.trim_end_matches('/'),
            "/",
            self.search_path.trim_start_matches('/')
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    /// Tab-separated; what spreadsheet tools open directly.
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }

    /// Delimiter for the tabular formats.
    pub fn delimiter(&self) -> Option<Delim> {
        match self {
            ExportFormat::Csv => Some(Delim::Csv),
            ExportFormat::Tsv => Some(Delim::Tsv),
            ExportFormat::Json => None,
        }
    }
}

/// One requested output. `path: None` means "default name in `out_dir`".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportTarget {
    pub format: ExportFormat,
    pub path: Option<PathBuf>,
}

impl ExportTarget {
    pub fn new(format: ExportFormat) -> Self {
        Self { format, path: None }
    }

    pub fn at(format: ExportFormat, path: impl Into<PathBuf>) -> Self {
        Self { format, path: Some(path.into()) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    pub targets: Vec<ExportTarget>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            targets: vec![ExportTarget::new(ExportFormat::Csv)],
        }
    }
}

impl ExportOptions {
    /// `facilities_<stamp>.<ext>`
    pub fn default_file_name(format: ExportFormat, stamp: &str) -> String {
        format!("{DEFAULT_FILE_STEM}_{stamp}.{}", format.ext())
    }

    /// Final path for a target. A user path that is (or looks like) a directory
    /// gets the default file name inside it; no path means `out_dir`.
    pub fn out_path(&self, target: &ExportTarget, stamp: &str) -> PathBuf {
        let default_name = Self::default_file_name(target.format, stamp);
        match &target.path {
            None => self.out_dir.join(default_name),
            Some(p) if looks_like_dir_hint(p) || p.is_dir() => p.join(default_name),
            Some(p) => p.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn search_url_joins_cleanly() {
        let mut f = FetchOptions::default();
        assert_eq!(f.search_url(), "https://quality.healthfinder.fl.gov/Facility-Search/FacilityLocateSearch");
        f.base_url = s!("http://127.0.0.1:9000/");
        f.search_path = s!("search");
        assert_eq!(f.search_url(), "http://127.0.0.1:9000/search");
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let mut f = FetchOptions::default();
        assert!(f.validate().is_ok());
        f.timeout = Duration::ZERO;
        assert!(matches!(f.validate(), Err(ScrapeError::Config(_))));
    }

    #[test]
    fn out_path_resolution() {
        let opts = ExportOptions { out_dir: PathBuf::from("out"), targets: vec![] };
        let stamp = "20260101_120000";

        let p = opts.out_path(&ExportTarget::new(ExportFormat::Json), stamp);
        assert_eq!(p, Path::new("out").join("facilities_20260101_120000.json"));

        let p = opts.out_path(&ExportTarget::at(ExportFormat::Tsv, "exports/"), stamp);
        assert_eq!(p, Path::new("exports/").join("facilities_20260101_120000.tsv"));

        let p = opts.out_path(&ExportTarget::at(ExportFormat::Csv, "mine.txt"), stamp);
        assert_eq!(p, PathBuf::from("mine.txt"));
    }
}
