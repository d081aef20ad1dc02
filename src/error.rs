// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can end a run. Field-level anomalies never show up here;
/// they are absorbed by the extractor as empty values.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid query: facility name must not be empty")]
    InvalidQuery,

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("unexpected response from {url}: {reason}")]
    UnexpectedResponse { url: String, reason: String },

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("export failed: {0}")]
    Export(String),

    #[error("config error: {0}")]
    Config(String),
}

impl ScrapeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Only transport failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<::csv::Error> for ScrapeError {
    fn from(e: ::csv::Error) -> Self {
        Self::Export(e.to_string())
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Export(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
