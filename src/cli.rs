// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::config::{AppOptions, ExportFormat, ExportTarget, FileConfig};
use crate::error::{Result, ScrapeError};
use crate::log::{self, LogOptions};
use crate::progress::Progress;
use crate::record::FacilityRecord;
use crate::runner;

/// Search the Florida AHCA facility locator and export the results.
///
/// Without any format flag a CSV file is written to the output directory.
/// Format flags take an optional path: `--csv` uses the default timestamped
/// name, `--csv=hospitals.csv` writes exactly there, `--csv=exports/` writes
/// the default name inside that directory.
#[derive(Parser, Debug)]
#[command(name = "facility_scrape", version, about)]
pub struct Args {
    /// Facility name (or part of it) to search for
    pub name: String,

    /// Write CSV
    #[arg(long, value_name = "PATH", num_args = 0..=1, require_equals = true)]
    pub csv: Option<Option<PathBuf>>,

    /// Write tab-separated values (opens in spreadsheet tools)
    #[arg(long, value_name = "PATH", num_args = 0..=1, require_equals = true)]
    pub tsv: Option<Option<PathBuf>>,

    /// Write JSON
    #[arg(long, value_name = "PATH", num_args = 0..=1, require_equals = true)]
    pub json: Option<Option<PathBuf>>,

    /// Directory for default-named exports [default: out]
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Facility type filter sent with the search [default: All]
    #[arg(long = "type", value_name = "TYPE")]
    pub facility_type: Option<String>,

    /// License status filter sent with the search [default: Active/Open]
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Retries after a failed network attempt
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Keep only results whose name contains NAME
    #[arg(long)]
    pub match_name: bool,

    /// Config file [default: ./facility_scrape.toml if present]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Don't print the results table
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Requested formats in flag order (csv, tsv, json); empty if none given.
    fn targets(&self) -> Vec<ExportTarget> {
        [
            (ExportFormat::Csv, &self.csv),
            (ExportFormat::Tsv, &self.tsv),
            (ExportFormat::Json, &self.json),
        ]
        .into_iter()
        .filter_map(|(format, flag)| {
            flag.as_ref().map(|path| ExportTarget { format, path: path.clone() })
        })
        .collect()
    }
}

/// Defaults, then the config file, then flags.
pub fn options_from(args: &Args) -> Result<AppOptions> {
    let mut opts = AppOptions::new(args.name.trim());
    FileConfig::discover(args.config.as_deref())?.apply(&mut opts)?;

    if let Some(d) = &args.out_dir { opts.export.out_dir = d.clone(); }
    if let Some(t) = &args.facility_type { opts.fetch.facility_type = t.clone(); }
    if let Some(s) = &args.status { opts.fetch.license_status = s.clone(); }
    if let Some(t) = args.timeout {
        if t == 0 {
            return Err(ScrapeError::Config(s!("--timeout must be at least 1 second")));
        }
        opts.fetch.timeout = Duration::from_secs(t);
    }
    if let Some(r) = args.retries { opts.fetch.retries = r; }
    if args.match_name { opts.match_name = true; }

    let targets = args.targets();
    if !targets.is_empty() {
        opts.export.targets = targets;
    }
    Ok(opts)
}

/// Status lines on stderr so stdout stays the results table.
struct CliProgress;

impl Progress for CliProgress {
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn records_found(&mut self, kept: usize, dropped: usize) {
        if dropped > 0 {
            eprintln!("Found {kept} facilities ({dropped} entries skipped).");
        } else {
            eprintln!("Found {kept} facilities.");
        }
    }

    fn file_written(&mut self, path: &std::path::Path) {
        eprintln!("Wrote {}", path.display());
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    run_args(&args)
}

pub fn run_args(args: &Args) -> Result<()> {
    log::init(&LogOptions { verbosity: args.verbose, file: args.log_file.clone() })?;
    let opts = options_from(args)?;

    let mut progress = CliProgress;
    let summary = runner::run(&opts, Some(&mut progress))?;

    if !args.quiet {
        print!("{}", summary_table(&summary.records));
    }
    Ok(())
}

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s!(s)
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Fixed-width overview: identifier, name, type, city, phone.
pub fn summary_table(records: &[FacilityRecord]) -> String {
    let mut out = format!("{:<10}  {:<40}  {:<24}  {:<18}  {}\n", "ID", "NAME", "TYPE", "CITY", "PHONE");
    for r in records {
        out.push_str(&format!(
            "{:<10}  {:<40}  {:<24}  {:<18}  {}\n",
            clip(r.identifier().unwrap_or(""), 10),
            clip(&r.name, 40),
            clip(r.facility_type.as_deref().unwrap_or(""), 24),
            clip(r.street.city.as_deref().unwrap_or(""), 18),
            r.phone.as_deref().unwrap_or(""),
        ));
    }
    out
}
