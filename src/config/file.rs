// src/config/file.rs
//! Optional TOML config file. Every key is optional; present keys override
//! the compiled defaults and are in turn overridden by command-line flags.
//!
//! ```toml
//! [fetch]
//! timeout_secs = 30
//! retries = 1
//! facility_type = "Hospital"
//!
//! [export]
//! out_dir = "exports"
//! formats = ["csv", "json"]
//! match_name = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::consts::CONFIG_FILE;
use super::options::{AppOptions, ExportFormat, ExportTarget};
use crate::error::{Result, ScrapeError};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub fetch: FetchSection,
    pub export: ExportSection,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSection {
    pub base_url: Option<String>,
    pub search_path: Option<String>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<u32>,
    pub backoff_ms: Option<u64>,
    pub user_agent: Option<String>,
    pub facility_type: Option<String>,
    pub license_status: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSection {
    pub out_dir: Option<PathBuf>,
    pub formats: Option<Vec<ExportFormat>>,
    pub match_name: Option<bool>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ScrapeError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?;
        Self::parse(&text).map_err(|e| match e {
            ScrapeError::Config(msg) => ScrapeError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// An explicit path must exist; otherwise `facility_scrape.toml` in the
    /// working directory is used when present.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(p) = explicit {
            debug!(path = %p.display(), "loading config");
            return Self::load(p);
        }
        let local = Path::new(CONFIG_FILE);
        if local.is_file() {
            debug!(path = CONFIG_FILE, "loading config");
            return Self::load(local);
        }
        Ok(Self::default())
    }

    pub fn apply(&self, opts: &mut AppOptions) -> Result<()> {
        let f = &self.fetch;
        let fetch = &mut opts.fetch;
        if let Some(v) = &f.base_url { fetch.base_url = v.clone(); }
        if let Some(v) = &f.search_path { fetch.search_path = v.clone(); }
        if let Some(v) = f.timeout_secs {
            if v == 0 {
                return Err(ScrapeError::Config(s!("[fetch] timeout_secs must be at least 1")));
            }
            fetch.timeout = Duration::from_secs(v);
        }
        if let Some(v) = f.retries { fetch.retries = v; }
        if let Some(v) = f.backoff_ms { fetch.backoff = Duration::from_millis(v); }
        if let Some(v) = &f.user_agent { fetch.user_agent = v.clone(); }
        if let Some(v) = &f.facility_type { fetch.facility_type = v.clone(); }
        if let Some(v) = &f.license_status { fetch.license_status = v.clone(); }

        let e = &self.export;
        if let Some(v) = &e.out_dir { opts.export.out_dir = v.clone(); }
        if let Some(formats) = &e.formats {
            if !formats.is_empty() {
                opts.export.targets = formats.iter().copied().map(ExportTarget::new).collect();
            }
        }
        if let Some(v) = e.match_name { opts.match_name = v; }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_changes_nothing() {
        let cfg = FileConfig::parse("").unwrap();
        let mut opts = AppOptions::new("x");
        let before = opts.clone();
        cfg.apply(&mut opts).unwrap();
        assert_eq!(opts, before);
    }

    #[test]
    fn sections_override_defaults() {
        let cfg = FileConfig::parse(
            r#"
            [fetch]
            timeout_secs = 5
            retries = 0
            facility_type = "Hospital"

            [export]
            out_dir = "exports"
            formats = ["tsv", "json"]
            match_name = true
            "#,
        )
        .unwrap();
        let mut opts = AppOptions::new("x");
        cfg.apply(&mut opts).unwrap();
        assert_eq!(opts.fetch.timeout, Duration::from_secs(5));
        assert_eq!(opts.fetch.retries, 0);
        assert_eq!(opts.fetch.facility_type, "Hospital");
        assert_eq!(opts.export.out_dir, PathBuf::from("exports"));
        assert_eq!(
            opts.export.targets,
            vec![ExportTarget::new(ExportFormat::Tsv), ExportTarget::new(ExportFormat::Json)]
        );
        assert!(opts.match_name);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = FileConfig::parse("[fetch]\ntimeout_secs = 0\n").unwrap();
        let mut opts = AppOptions::new("x");
        assert!(matches!(cfg.apply(&mut opts), Err(ScrapeError::Config(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = FileConfig::parse("[fetch]\ntimeout = 5\n").unwrap_err();
        assert!(matches!(err, ScrapeError::Config(_)));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = FileConfig::discover(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ScrapeError::Io { .. }));
    }
}
