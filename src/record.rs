// src/record.rs
//! The facility record and its flat tabular mirror.
//!
//! `FacilityRecord` is what the extractor produces and what JSON exports look
//! like (addresses nested). `FacilityRow` is the same data flattened to one
//! column per attribute, which is the shape CSV/TSV files use.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    Active,
    Inactive,
    Expired,
    #[default]
    Unknown,
}

impl LicenseStatus {
    /// Lenient read of the site's status text ("Licensed", "Active/Open", "Closed", ...).
    pub fn parse(text: &str) -> Self {
        let t = text.trim().to_ascii_lowercase();
        // "inactive" contains "active"; check the negatives first
        if t.starts_with("inactive") || t.starts_with("closed") || t.starts_with("revoked") {
            Self::Inactive
        } else if t.starts_with("expired") {
            Self::Expired
        } else if t.starts_with("active")
            || t.starts_with("open")
            || t.starts_with("licensed")
            || t.starts_with("current")
        {
            Self::Active
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Expired => "expired",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfitStatus {
    ForProfit,
    NonProfit,
    #[default]
    Unknown,
}

impl ProfitStatus {
    pub fn parse(text: &str) -> Self {
        let t: String = text
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        if t.starts_with("notforprofit") || t.starts_with("nonprofit") {
            Self::NonProfit
        } else if t.starts_with("forprofit") || t.starts_with("proprietary") {
            Self::ForProfit
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForProfit => "for-profit",
            Self::NonProfit => "non-profit",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub county: Option<String>,
}

impl Address {
    /// "line, city, state zip" with missing parts skipped.
    pub fn one_line(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(l) = &self.line { parts.push(l.clone()); }
        if let Some(c) = &self.city { parts.push(c.clone()); }
        let tail = [self.state.as_deref(), self.postal_code.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if !tail.is_empty() { parts.push(tail); }
        parts.join(", ")
    }
}

/// One healthcare facility from the search results.
///
/// Only built by the extractor when both a name and an identifier were found,
/// so `name` is never empty and `identifier()` is always `Some` for extracted
/// records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub name: String,
    pub facility_type: Option<String>,
    pub ahca_number: Option<String>,
    pub phone: Option<String>,
    pub licensed_beds: Option<u32>,

    pub license_id: Option<String>,
    pub license_number: Option<String>,
    pub status: LicenseStatus,
    pub effective_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,

    pub street: Address,
    pub mailing: Address,

    pub owner: Option<String>,
    pub owner_since: Option<NaiveDate>,
    pub profit_status: ProfitStatus,
    pub administrator: Option<String>,
    pub web_address: Option<String>,
}

impl FacilityRecord {
    /// AHCA number, falling back to the license number, then the license id.
    pub fn identifier(&self) -> Option<&str> {
        self.ahca_number
            .as_deref()
            .or(self.license_number.as_deref())
            .or(self.license_id.as_deref())
    }
}

/// Column order of every tabular export.
pub const COLUMNS: [&str; 25] = [
    "name", "facility_type", "ahca_number", "phone", "licensed_beds",
    "license_id", "license_number", "license_status", "license_effective", "license_expiration",
    "street_address", "street_city", "street_state", "street_zip", "street_county",
    "mailing_address", "mailing_city", "mailing_state", "mailing_zip", "mailing_county",
    "owner", "owner_since", "profit_status", "administrator", "web_address",
];

/// Flat tabular form of a `FacilityRecord`. Field order must match `COLUMNS`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityRow {
    pub name: String,
    pub facility_type: Option<String>,
    pub ahca_number: Option<String>,
    pub phone: Option<String>,
    pub licensed_beds: Option<u32>,
    pub license_id: Option<String>,
    pub license_number: Option<String>,
    pub license_status: LicenseStatus,
    pub license_effective: Option<NaiveDate>,
    pub license_expiration: Option<NaiveDate>,
    pub street_address: Option<String>,
    pub street_city: Option<String>,
    pub street_state: Option<String>,
    pub street_zip: Option<String>,
    pub street_county: Option<String>,
    pub mailing_address: Option<String>,
    pub mailing_city: Option<String>,
    pub mailing_state: Option<String>,
    pub mailing_zip: Option<String>,
    pub mailing_county: Option<String>,
    pub owner: Option<String>,
    pub owner_since: Option<NaiveDate>,
    pub profit_status: ProfitStatus,
    pub administrator: Option<String>,
    pub web_address: Option<String>,
}

impl From<&FacilityRecord> for FacilityRow {
    fn from(r: &FacilityRecord) -> Self {
        Self {
            name: r.name.clone(),
            facility_type: r.facility_type.clone(),
            ahca_number: r.ahca_number.clone(),
            phone: r.phone.clone(),
            licensed_beds: r.licensed_beds,
            license_id: r.license_id.clone(),
            license_number: r.license_number.clone(),
            license_status: r.status,
            license_effective: r.effective_date,
            license_expiration: r.expiration_date,
            street_address: r.street.line.clone(),
            street_city: r.street.city.clone(),
            street_state: r.street.state.clone(),
            street_zip: r.street.postal_code.clone(),
            street_county: r.street.county.clone(),
            mailing_address: r.mailing.line.clone(),
            mailing_city: r.mailing.city.clone(),
            mailing_state: r.mailing.state.clone(),
            mailing_zip: r.mailing.postal_code.clone(),
            mailing_county: r.mailing.county.clone(),
            owner: r.owner.clone(),
            owner_since: r.owner_since,
            profit_status: r.profit_status,
            administrator: r.administrator.clone(),
            web_address: r.web_address.clone(),
        }
    }
}

impl From<FacilityRow> for FacilityRecord {
    fn from(r: FacilityRow) -> Self {
        Self {
            name: r.name,
            facility_type: r.facility_type,
            ahca_number: r.ahca_number,
            phone: r.phone,
            licensed_beds: r.licensed_beds,
            license_id: r.license_id,
            license_number: r.license_number,
            status: r.license_status,
            effective_date: r.license_effective,
            expiration_date: r.license_expiration,
            street: Address {
                line: r.street_address,
                city: r.street_city,
                state: r.street_state,
                postal_code: r.street_zip,
                county: r.street_county,
            },
            mailing: Address {
                line: r.mailing_address,
                city: r.mailing_city,
                state: r.mailing_state,
                postal_code: r.mailing_zip,
                county: r.mailing_county,
            },
            owner: r.owner,
            owner_since: r.owner_since,
            profit_status: r.profit_status,
            administrator: r.administrator,
            web_address: r.web_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_variants() {
        assert_eq!(LicenseStatus::parse("Licensed"), LicenseStatus::Active);
        assert_eq!(LicenseStatus::parse("Active/Open"), LicenseStatus::Active);
        assert_eq!(LicenseStatus::parse("  INACTIVE "), LicenseStatus::Inactive);
        assert_eq!(LicenseStatus::parse("Closed"), LicenseStatus::Inactive);
        assert_eq!(LicenseStatus::parse("Expired 2021"), LicenseStatus::Expired);
        assert_eq!(LicenseStatus::parse("pending review"), LicenseStatus::Unknown);
        assert_eq!(LicenseStatus::parse(""), LicenseStatus::Unknown);
    }

    #[test]
    fn profit_text_variants() {
        assert_eq!(ProfitStatus::parse("For Profit"), ProfitStatus::ForProfit);
        assert_eq!(ProfitStatus::parse("for-profit"), ProfitStatus::ForProfit);
        assert_eq!(ProfitStatus::parse("Not For Profit"), ProfitStatus::NonProfit);
        assert_eq!(ProfitStatus::parse("Non-Profit"), ProfitStatus::NonProfit);
        assert_eq!(ProfitStatus::parse("Government"), ProfitStatus::Unknown);
    }

    #[test]
    fn identifier_falls_back_to_license_fields() {
        let mut r = FacilityRecord { name: s!("A"), ..Default::default() };
        assert_eq!(r.identifier(), None);
        r.license_id = Some(s!("LID9"));
        assert_eq!(r.identifier(), Some("LID9"));
        r.license_number = Some(s!("HOSP1"));
        assert_eq!(r.identifier(), Some("HOSP1"));
        r.ahca_number = Some(s!("100001"));
        assert_eq!(r.identifier(), Some("100001"));
    }

    #[test]
    fn row_conversion_is_lossless() {
        let rec = FacilityRecord {
            name: s!("Bayfront"),
            ahca_number: Some(s!("100012")),
            licensed_beds: Some(480),
            status: LicenseStatus::Active,
            effective_date: NaiveDate::from_ymd_opt(2023, 7, 1),
            street: Address { city: Some(s!("St. Petersburg")), ..Default::default() },
            mailing: Address { postal_code: Some(s!("33701")), ..Default::default() },
            profit_status: ProfitStatus::NonProfit,
            ..Default::default()
        };
        let back = FacilityRecord::from(FacilityRow::from(&rec));
        assert_eq!(back, rec);
    }

    #[test]
    fn one_line_skips_missing_parts() {
        let a = Address {
            line: Some(s!("1 Main St")),
            state: Some(s!("FL")),
            postal_code: Some(s!("32301")),
            ..Default::default()
        };
        assert_eq!(a.one_line(), "1 Main St, FL 32301");
        assert_eq!(Address::default().one_line(), "");
    }
}
