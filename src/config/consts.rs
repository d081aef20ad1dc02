// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://quality.healthfinder.fl.gov";
pub const SEARCH_PATH: &str = "/Facility-Search/FacilityLocateSearch";
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0.0.0 Safari/537.36";
pub const TIMEOUT_SECS: u64 = 20;
pub const RETRIES: u32 = 2; // extra attempts after the first
pub const BACKOFF_MS: u64 = 2_000; // doubles per retry

// Search form
pub const DEFAULT_FACILITY_TYPE: &str = "All";
pub const DEFAULT_LICENSE_STATUS: &str = "Active/Open";
pub const SEARCH_TYPE: &str = "1";
pub const SITE_STATE: &str = "FL"; // the locator only lists Florida facilities

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE_STEM: &str = "facilities";
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "facility_scrape.toml";
