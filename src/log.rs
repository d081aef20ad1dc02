// src/log.rs
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, fmt::time::uptime, prelude::*};

use crate::error::{Result, ScrapeError};
use crate::file::ensure_directory;

#[derive(Clone, Debug, Default)]
pub struct LogOptions {
    /// 0 = warn, 1 = info, 2 = debug, 3+ = trace. Ignored when `RUST_LOG` is set.
    pub verbosity: u8,
    /// Also append plain-text logs here.
    pub file: Option<PathBuf>,
}

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber: stderr, plus an optional log file.
/// A second call is a no-op.
pub fn init(opts: &LogOptions) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // keep dependency chatter at warn unless RUST_LOG says otherwise
        EnvFilter::new(format!("warn,facility_scrape={}", level_for(opts.verbosity)))
    });

    let file_layer = match &opts.file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    ensure_directory(parent)?;
                }
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| ScrapeError::io(path, e))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_timer(uptime())
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_timer(uptime()).with_writer(std::io::stderr))
        .with(file_layer)
        .try_init();
    Ok(())
}
