// src/config/mod.rs
pub mod consts;
pub mod file;
pub mod options;

pub use file::FileConfig;
pub use options::{AppOptions, ExportFormat, ExportOptions, ExportTarget, FetchOptions};
