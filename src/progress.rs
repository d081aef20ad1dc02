// src/progress.rs
/// Lightweight progress reporting for a run (fetch → extract → export).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called once extraction is done. `dropped` counts noise fragments and
    /// records removed by the name filter.
    fn records_found(&mut self, _kept: usize, _dropped: usize) {}

    /// Called for each export file written.
    fn file_written(&mut self, _path: &std::path::Path) {}

    /// Called at the end of a successful run.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
