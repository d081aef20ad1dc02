// tests/export_roundtrip.rs
use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;

use facility_scrape::config::{ExportFormat, ExportOptions, ExportTarget};
use facility_scrape::csv::{Delim, read_records_from_path};
use facility_scrape::file::{export_records, export_records_stamped, read_json};
use facility_scrape::{FacilityRecord, extract};

fn sample_records() -> Vec<FacilityRecord> {
    extract(include_str!("fixtures/results_table.html")).unwrap().collect()
}

#[test]
fn csv_tsv_and_json_read_back_identically() {
    let tmp = tempfile::tempdir().unwrap();
    let records = sample_records();
    let export = ExportOptions {
        out_dir: tmp.path().to_path_buf(),
        targets: vec![
            ExportTarget::new(ExportFormat::Csv),
            ExportTarget::new(ExportFormat::Tsv),
            ExportTarget::new(ExportFormat::Json),
        ],
    };

    let written = export_records(&export, &records).unwrap();
    assert_eq!(written.len(), 3);

    assert_eq!(read_records_from_path(&written[0], Delim::Csv).unwrap(), records);
    assert_eq!(read_records_from_path(&written[1], Delim::Tsv).unwrap(), records);
    assert_eq!(read_json(&written[2]).unwrap(), records);
}

#[test]
fn default_names_share_one_timestamp() {
    let tmp = tempfile::tempdir().unwrap();
    let export = ExportOptions {
        out_dir: tmp.path().join("nested/out"),
        targets: vec![ExportTarget::new(ExportFormat::Csv), ExportTarget::new(ExportFormat::Json)],
    };

    let written = export_records_stamped(&export, &sample_records(), "20260102_030405").unwrap();
    assert_eq!(
        written,
        vec![
            tmp.path().join("nested/out/facilities_20260102_030405.csv"),
            tmp.path().join("nested/out/facilities_20260102_030405.json"),
        ]
    );
    assert!(written.iter().all(|p| p.is_file()));
}

#[test]
fn explicit_paths_and_directory_hints() {
    let tmp = tempfile::tempdir().unwrap();
    let exact = tmp.path().join("deep/dir/hospitals.txt");
    let hinted: PathBuf = format!("{}/sheets/", tmp.path().display()).into();
    let export = ExportOptions {
        out_dir: tmp.path().join("unused"),
        targets: vec![
            ExportTarget::at(ExportFormat::Csv, &exact),
            ExportTarget::at(ExportFormat::Tsv, &hinted),
        ],
    };

    let written = export_records_stamped(&export, &sample_records(), "20260102_030405").unwrap();
    assert_eq!(written[0], exact);
    assert_eq!(written[1], hinted.join("facilities_20260102_030405.tsv"));
    assert!(!tmp.path().join("unused").exists());

    // extension belongs to the user; format decides the content
    let text = fs::read_to_string(&exact).unwrap();
    assert!(text.starts_with("name,facility_type,ahca_number,"));
}

#[test]
fn empty_result_still_writes_headers_and_empty_array() {
    let tmp = tempfile::tempdir().unwrap();
    let export = ExportOptions {
        out_dir: tmp.path().to_path_buf(),
        targets: vec![ExportTarget::new(ExportFormat::Tsv), ExportTarget::new(ExportFormat::Json)],
    };
    let written = export_records(&export, &[]).unwrap();

    let tsv = fs::read_to_string(&written[0]).unwrap();
    assert_eq!(tsv.lines().count(), 1);
    assert!(tsv.starts_with("name\tfacility_type\t"));

    let json = fs::read_to_string(&written[1]).unwrap();
    assert_eq!(json.trim(), "[]");
}
