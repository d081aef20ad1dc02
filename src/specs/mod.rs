// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific extraction for the facility search site. A spec knows
//! *where the ground truth lives in the HTML* and *how to read it tolerantly*;
//! it never fetches, filters, or writes files.
//!
//! ## What lives here
//! - **Pure HTML parsing** of the search results page (`facilities`).
//! - **Label vocabulary** and value parsers shared by every layout (`fields`):
//!   label normalization, dates, counts, phone numbers, license ids in links.
//!
//! ## What does **not** live here
//! - **HTTP** (session, token, retries): `core::net`.
//! - **Filtering and export**: `runner` and `file`.
//!
//! ## Typical call chain
//! ```text
//! runner::run → core::net::FacilityClient::fetch → raw HTML
//!            → specs::facilities::extract       → Records (iterator)
//!            → file::export_records
//! ```
//!
//! ## Conventions & invariants
//! - Records come out in **document order**.
//! - A fragment becomes a record only with a **name and an identifier**;
//!   anything else is page noise and is dropped silently (counted, logged at debug).
//! - A field that is absent or unparseable is empty, never an error.
//!
//! ## Testing notes
//! - Everything here is testable **offline** against saved HTML
//!   (`tests/fixtures/`).
pub mod facilities;
pub mod fields;
