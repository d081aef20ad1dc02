// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod csv;
pub mod error;
pub mod file;
pub mod log;
pub mod progress;
pub mod record;
pub mod runner;
pub mod specs;

pub use crate::core::net::FacilityClient;
pub use error::{Result, ScrapeError};
pub use record::{Address, FacilityRecord, LicenseStatus, ProfitStatus};
pub use specs::facilities::{Records, extract};
