// src/specs/fields.rs
//! Label → field mapping and the lenient value parsers.
//!
//! The label table below is the contract with the site: a label is normalized
//! (lowercase, punctuation to spaces, common abbreviations expanded) and then
//! looked up. Anything not in the table is ignored.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::config::consts::SITE_STATE;
use crate::core::sanitize::{clean_text, normalize_ws};
use crate::record::{FacilityRecord, LicenseStatus, ProfitStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    FacilityType,
    AhcaNumber,
    Phone,
    LicensedBeds,
    LicenseId,
    LicenseNumber,
    Status,
    EffectiveDate,
    ExpirationDate,
    StreetLine,
    StreetCity,
    StreetState,
    StreetZip,
    StreetCounty,
    MailingLine,
    MailingCity,
    MailingState,
    MailingZip,
    MailingCounty,
    Owner,
    OwnerSince,
    ProfitStatus,
    Administrator,
    WebAddress,
}

/// Normalized label text → field.
const LABELS: &[(&str, Field)] = &[
    ("name", Field::Name),
    ("facility name", Field::Name),
    ("provider name", Field::Name),
    ("facility provider name", Field::Name),
    ("facility type", Field::FacilityType),
    ("provider type", Field::FacilityType),
    ("type", Field::FacilityType),
    ("ahca number", Field::AhcaNumber),
    ("ahca", Field::AhcaNumber),
    ("ahca id", Field::AhcaNumber),
    ("ahca file number", Field::AhcaNumber),
    ("file number", Field::AhcaNumber),
    ("registry number", Field::AhcaNumber),
    ("phone", Field::Phone),
    ("phone number", Field::Phone),
    ("telephone", Field::Phone),
    ("telephone number", Field::Phone),
    ("licensed beds", Field::LicensedBeds),
    ("beds", Field::LicensedBeds),
    ("bed count", Field::LicensedBeds),
    ("total beds", Field::LicensedBeds),
    ("number of beds", Field::LicensedBeds),
    ("license id", Field::LicenseId),
    ("lid", Field::LicenseId),
    ("license number", Field::LicenseNumber),
    ("license", Field::LicenseNumber),
    ("certificate number", Field::LicenseNumber),
    ("status", Field::Status),
    ("license status", Field::Status),
    ("licensure status", Field::Status),
    ("effective date", Field::EffectiveDate),
    ("effective", Field::EffectiveDate),
    ("license effective", Field::EffectiveDate),
    ("license effective date", Field::EffectiveDate),
    ("issue date", Field::EffectiveDate),
    ("expiration date", Field::ExpirationDate),
    ("expiration", Field::ExpirationDate),
    ("expires", Field::ExpirationDate),
    ("license expiration", Field::ExpirationDate),
    ("license expiration date", Field::ExpirationDate),
    ("address", Field::StreetLine),
    ("street", Field::StreetLine),
    ("street address", Field::StreetLine),
    ("physical address", Field::StreetLine),
    ("city", Field::StreetCity),
    ("street city", Field::StreetCity),
    ("state", Field::StreetState),
    ("street state", Field::StreetState),
    ("zip", Field::StreetZip),
    ("zip code", Field::StreetZip),
    ("postal code", Field::StreetZip),
    ("street zip", Field::StreetZip),
    ("street zip code", Field::StreetZip),
    ("street postal code", Field::StreetZip),
    ("county", Field::StreetCounty),
    ("street county", Field::StreetCounty),
    ("mailing address", Field::MailingLine),
    ("mailing street", Field::MailingLine),
    ("mailing city", Field::MailingCity),
    ("mailing state", Field::MailingState),
    ("mailing zip", Field::MailingZip),
    ("mailing zip code", Field::MailingZip),
    ("mailing postal code", Field::MailingZip),
    ("mailing county", Field::MailingCounty),
    ("owner", Field::Owner),
    ("owner name", Field::Owner),
    ("licensee", Field::Owner),
    ("owned by", Field::Owner),
    ("owner since", Field::OwnerSince),
    ("owned since", Field::OwnerSince),
    ("profit status", Field::ProfitStatus),
    ("profit", Field::ProfitStatus),
    ("for profit", Field::ProfitStatus),
    ("for profit non profit", Field::ProfitStatus),
    ("administrator", Field::Administrator),
    ("administrator name", Field::Administrator),
    ("ceo", Field::Administrator),
    ("administrator ceo", Field::Administrator),
    ("administrator or ceo", Field::Administrator),
    ("chief executive officer", Field::Administrator),
    ("web address", Field::WebAddress),
    ("website", Field::WebAddress),
    ("web site", Field::WebAddress),
    ("web", Field::WebAddress),
    ("url", Field::WebAddress),
];

/// Lowercase, `#` → "number", other punctuation → space, abbreviations expanded,
/// whitespace collapsed.
pub fn normalize_label(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| match c {
            '#' => ' ',
            c if c.is_alphanumeric() => c.to_ascii_lowercase(),
            _ => ' ',
        })
        .collect();
    let hash = raw.contains('#');

    let mut words: Vec<&str> = spaced
        .split_whitespace()
        .map(|w| match w {
            "no" | "nbr" | "num" | "nr" => "number",
            "lic" => "license",
            "licence" => "license",
            "exp" => "expiration",
            "eff" => "effective",
            "addr" => "address",
            "tel" => "telephone",
            "admin" => "administrator",
            other => other,
        })
        .collect();
    if hash && words.last() != Some(&"number") {
        words.push("number");
    }
    words.join(" ")
}

impl Field {
    pub fn from_label(raw: &str) -> Option<Field> {
        let key = normalize_label(raw);
        if key.is_empty() { return None; }
        LABELS.iter().find(|(l, _)| *l == key).map(|(_, f)| *f)
    }
}

/* ---------------- value parsers ---------------- */

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

/// Parse the site's date text. Unparsable text is `None`, never an error.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let t = normalize_ws(text);
    if t.is_empty() { return None; }

    // ASP.NET "1/15/2020 12:00:00 AM" / ISO "2020-01-15T00:00:00"
    let head = t.split(['T', ' ']).next().unwrap_or(&t);
    let candidates = [t.as_str(), head];

    for c in candidates {
        // "1/15/20": %Y would happily read year 20, so route two-digit years to %y
        let short_year = c.contains('/') && c.rsplit('/').next().is_some_and(|y| y.len() == 2);
        if short_year {
            if let Ok(d) = NaiveDate::parse_from_str(c, "%m/%d/%y") {
                return Some(d);
            }
            continue;
        }
        for f in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(c, f) {
                return Some(d);
            }
        }
    }
    None
}

/// Lenient count: "120", "1,204", "120 beds". Anything else is `None`.
pub fn parse_count(text: &str) -> Option<u32> {
    let t = normalize_ws(text);
    let mut words = t.split(' ');
    let first = words.next()?.replace(',', "");
    let rest: Vec<&str> = words.collect();
    if rest.len() > 1 || rest.iter().any(|w| w.chars().any(|c| c.is_ascii_digit())) {
        return None;
    }
    first.parse::<u32>().ok()
}

/// `...?LID=12345&x=y` → `12345`. Only a whole `LID` parameter counts, not
/// names ending in it (`valid=`, `solid=`).
pub fn license_id_from_href(href: &str) -> Option<String> {
    let lc = href.to_ascii_lowercase();
    let i = lc
        .match_indices("lid=")
        .map(|(i, _)| i)
        .find(|&i| i == 0 || matches!(lc.as_bytes()[i - 1], b'?' | b'&' | b';'))?
        + 4;
    let id: String = href[i..]
        .chars()
        .take_while(|c| !matches!(c, '&' | '#' | ';'))
        .collect();
    clean_text(&id)
}

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("static phone regex must compile")
});

/// First phone-looking substring in any of the cells.
pub fn find_phone<'a, I>(cells: I) -> Option<String>
where
    I: IntoIterator<Item = &'a String>,
{
    cells
        .into_iter()
        .find_map(|c| PHONE.find(c).map(|m| m.as_str().to_string()))
}

fn is_http(s: &str) -> bool {
    let l = s.to_ascii_lowercase();
    l.starts_with("http://") || l.starts_with("https://")
}

/* ---------------- record assembly ---------------- */

/// One labeled value inside a fragment. `href` is the first link in the value
/// cell, when the value came from an element that had one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Labeled {
    pub label: String,
    pub value: String,
    pub href: Option<String>,
}

fn set_once<T>(slot: &mut Option<T>, v: Option<T>) {
    if slot.is_none() { *slot = v; }
}

/// Accumulates labeled values into a record. First non-empty value per field wins.
#[derive(Default)]
pub struct RecordBuilder {
    name: Option<String>,
    rec: FacilityRecord,
}

impl RecordBuilder {
    pub fn apply(&mut self, pair: &Labeled) {
        let Some(field) = Field::from_label(&pair.label) else { return };
        let v = pair.value.as_str();
        let r = &mut self.rec;
        match field {
            Field::Name => set_once(&mut self.name, clean_text(v)),
            Field::FacilityType => set_once(&mut r.facility_type, clean_text(v)),
            Field::AhcaNumber => set_once(&mut r.ahca_number, clean_text(v)),
            Field::Phone => set_once(&mut r.phone, clean_text(v)),
            Field::LicensedBeds => set_once(&mut r.licensed_beds, parse_count(v)),
            Field::LicenseId => set_once(
                &mut r.license_id,
                clean_text(v).or_else(|| pair.href.as_deref().and_then(license_id_from_href)),
            ),
            Field::LicenseNumber => set_once(&mut r.license_number, clean_text(v)),
            Field::Status => {
                if r.status == LicenseStatus::Unknown { r.status = LicenseStatus::parse(v); }
            }
            Field::EffectiveDate => set_once(&mut r.effective_date, parse_date(v)),
            Field::ExpirationDate => set_once(&mut r.expiration_date, parse_date(v)),
            Field::StreetLine => set_once(&mut r.street.line, clean_text(v)),
            Field::StreetCity => set_once(&mut r.street.city, clean_text(v)),
            Field::StreetState => set_once(&mut r.street.state, clean_text(v)),
            Field::StreetZip => set_once(&mut r.street.postal_code, clean_text(v)),
            Field::StreetCounty => set_once(&mut r.street.county, clean_text(v)),
            Field::MailingLine => set_once(&mut r.mailing.line, clean_text(v)),
            Field::MailingCity => set_once(&mut r.mailing.city, clean_text(v)),
            Field::MailingState => set_once(&mut r.mailing.state, clean_text(v)),
            Field::MailingZip => set_once(&mut r.mailing.postal_code, clean_text(v)),
            Field::MailingCounty => set_once(&mut r.mailing.county, clean_text(v)),
            Field::Owner => set_once(&mut r.owner, clean_text(v)),
            Field::OwnerSince => set_once(&mut r.owner_since, parse_date(v)),
            Field::ProfitStatus => {
                if r.profit_status == ProfitStatus::Unknown { r.profit_status = ProfitStatus::parse(v); }
            }
            Field::Administrator => set_once(&mut r.administrator, clean_text(v)),
            Field::WebAddress => {
                let link = pair.href.as_deref().filter(|h| is_http(h)).map(str::to_string);
                set_once(&mut r.web_address, link.or_else(|| clean_text(v)));
            }
        }
    }

    /// Fill gaps from fragment-wide evidence: `LID=` links and phone-shaped cells.
    pub fn fallbacks<'a>(&mut self, links: &[String], cells: impl IntoIterator<Item = &'a String>) {
        if self.rec.license_id.is_none() {
            self.rec.license_id = links.iter().find_map(|h| license_id_from_href(h));
        }
        if self.rec.phone.is_none() {
            self.rec.phone = find_phone(cells);
        }
    }

    /// The record, if it has both a name and an identifier.
    /// Every listed facility is in Florida, so an unlabeled street state is `FL`.
    pub fn finish(self) -> Option<FacilityRecord> {
        let Self { name, mut rec } = self;
        rec.name = name?;
        rec.identifier()?;
        if rec.street.state.is_none() {
            rec.street.state = Some(s!(SITE_STATE));
        }
        Some(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lab(label: &str, value: &str) -> Labeled {
        Labeled { label: s!(label), value: s!(value), href: None }
    }

    #[test]
    fn label_variants_map_to_the_same_field() {
        for l in ["License Number", "LICENSE NUMBER:", "License #", "Lic. No.", "license no", "License Nbr"] {
            assert_eq!(Field::from_label(l), Some(Field::LicenseNumber), "{l}");
        }
        assert_eq!(Field::from_label("AHCA #"), Some(Field::AhcaNumber));
        assert_eq!(Field::from_label("Administrator/CEO"), Some(Field::Administrator));
        assert_eq!(Field::from_label("Street Zip Code"), Some(Field::StreetZip));
        assert_eq!(Field::from_label("Mailing Zip"), Some(Field::MailingZip));
        assert_eq!(Field::from_label("Web Site"), Some(Field::WebAddress));
        assert_eq!(Field::from_label("Favorite Color"), None);
        assert_eq!(Field::from_label("  "), None);
    }

    #[test]
    fn dates_in_site_formats() {
        let d = NaiveDate::from_ymd_opt(2020, 1, 15);
        assert_eq!(parse_date("2020-01-15"), d);
        assert_eq!(parse_date("01/15/2020"), d);
        assert_eq!(parse_date("1/15/2020 12:00:00 AM"), d);
        assert_eq!(parse_date("1/15/20"), d);
        assert_eq!(parse_date("January 15, 2020"), d);
        assert_eq!(parse_date("Jan 15, 2020"), d);
        assert_eq!(parse_date("2020-01-15T00:00:00"), d);
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date("13/45/2020"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn counts_are_lenient() {
        assert_eq!(parse_count("120"), Some(120));
        assert_eq!(parse_count(" 1,204 "), Some(1204));
        assert_eq!(parse_count("120 beds"), Some(120));
        assert_eq!(parse_count("abc"), None);
        assert_eq!(parse_count("12 of 40"), None);
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn lid_from_link() {
        assert_eq!(license_id_from_href("/Facility-Provider/Profile?LID=51234&LinkId=9"), Some(s!("51234")));
        assert_eq!(license_id_from_href("profile?lid=77"), Some(s!("77")));
        assert_eq!(license_id_from_href("/about"), None);
        assert_eq!(
            license_id_from_href("/Facility-Search/FacilityProfilePage?valid=true&LID=51234"),
            Some(s!("51234"))
        );
        assert_eq!(license_id_from_href("LID=8;x=1"), Some(s!("8")));
        assert_eq!(license_id_from_href("/p?solid=4"), None);
    }

    #[test]
    fn phone_pattern() {
        let cells = vec![s!("Tampa"), s!("Call (813) 844-7000 today")];
        assert_eq!(find_phone(&cells), Some(s!("(813) 844-7000")));
        assert_eq!(find_phone(&vec![s!("33606")]), None);
    }

    #[test]
    fn builder_example_fragment() {
        let mut b = RecordBuilder::default();
        for p in [
            lab("Name", "Sunrise Care"),
            lab("AHCA Number", "100200"),
            lab("License Number", "12345"),
            lab("Licensed Beds", "abc"),
            lab("Owner Since", "2020-01-15"),
        ] {
            b.apply(&p);
        }
        let r = b.finish().unwrap();
        assert_eq!(r.license_number.as_deref(), Some("12345"));
        assert_eq!(r.licensed_beds, None);
        assert_eq!(r.owner_since, NaiveDate::from_ymd_opt(2020, 1, 15));
    }

    #[test]
    fn first_non_empty_value_wins() {
        let mut b = RecordBuilder::default();
        b.apply(&lab("Name", "  "));
        b.apply(&lab("Facility Name", "Alpha"));
        b.apply(&lab("Name", "Beta"));
        b.apply(&lab("AHCA Number", "1"));
        assert_eq!(b.finish().unwrap().name, "Alpha");
    }

    #[test]
    fn missing_identity_is_dropped() {
        let mut b = RecordBuilder::default();
        b.apply(&lab("Name", "Only A Name"));
        assert!(b.finish().is_none());

        let mut b = RecordBuilder::default();
        b.apply(&lab("AHCA Number", "100"));
        assert!(b.finish().is_none());
    }

    #[test]
    fn web_prefers_external_href() {
        let mut b = RecordBuilder::default();
        b.apply(&Labeled { label: s!("Website"), value: s!("Visit site"), href: Some(s!("https://acme.org")) });
        b.apply(&lab("Name", "Acme"));
        b.apply(&lab("AHCA", "5"));
        assert_eq!(b.finish().unwrap().web_address.as_deref(), Some("https://acme.org"));
    }

    #[test]
    fn street_state_defaults_to_florida() {
        let mut b = RecordBuilder::default();
        b.apply(&lab("Name", "Acme"));
        b.apply(&lab("AHCA Number", "1"));
        assert_eq!(b.finish().unwrap().street.state.as_deref(), Some("FL"));

        let mut b = RecordBuilder::default();
        b.apply(&lab("Name", "Acme"));
        b.apply(&lab("AHCA Number", "1"));
        b.apply(&lab("State", "GA"));
        let r = b.finish().unwrap();
        assert_eq!(r.street.state.as_deref(), Some("GA"));
        assert_eq!(r.mailing.state, None);
    }

    #[test]
    fn fallbacks_fill_license_id_and_phone() {
        let mut b = RecordBuilder::default();
        b.apply(&lab("Name", "Acme"));
        b.fallbacks(&[s!("/x?LID=42")], &vec![s!("850-555-0100")]);
        let r = b.finish().unwrap();
        assert_eq!(r.license_id.as_deref(), Some("42"));
        assert_eq!(r.phone.as_deref(), Some("850-555-0100"));
    }
}
