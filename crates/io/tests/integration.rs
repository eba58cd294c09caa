use std::path::PathBuf;

use ledgersift_engine::{run, TriageConfig};
use ledgersift_io::{csv, xlsx};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_and_run() -> ledgersift_engine::TriageResult {
    let table = csv::import(&fixtures_dir().join("bank-export.csv")).unwrap();
    run(&TriageConfig::default(), &table).unwrap()
}

#[test]
fn full_pipeline_over_bank_export() {
    let result = load_and_run();
    let s = &result.summary;

    // 6 transactions + 1 blank line of bare delimiters
    assert_eq!(s.total_records, 7);

    // CMG pair resolves via distinct clinic names; the WMHP pair shares
    // the first five name characters ("Echo ") and stays colliding
    assert_eq!(s.duplicates, 2);
    assert_eq!(s.double_duplicates, 2);

    // GLEP is solitary; the missing-post-date record and the blank row
    // are unkeyed and fold into the unique tier
    assert_eq!(s.unique, 3);
    assert_eq!(s.unkeyed, 2);
    assert_eq!(s.candidate_groups, 2);
}

#[test]
fn normalization_shapes_the_output_columns() {
    let result = load_and_run();
    // Pruned: DFI_ID, ACCOUNT_NUMBER, FITID, CHECK_NO. Prepended: DATE, ID.
    assert_eq!(
        result.tiers.unique.columns,
        vec!["DATE", "ID", "ACCOUNT_NAME", "NAME", "TRNAMT", "DTPOSTED", "MEMO"]
    );
}

#[test]
fn identity_keys_match_hand_computation() {
    let result = load_and_run();

    // 2025-06-06 is spreadsheet serial 45814
    assert_eq!(
        result.tiers.duplicate.value(0, "ID"),
        Some("CMG45814100.00Alpha")
    );
    assert_eq!(
        result.tiers.duplicate.value(0, "DATE"),
        Some("06/06/2025")
    );
    assert_eq!(
        result.tiers.duplicate.value(1, "ID"),
        Some("CMG45814100.00Beta ")
    );

    // Unresolved pair keeps a shared tie-broken key
    assert_eq!(
        result.tiers.double_duplicate.value(0, "ID"),
        result.tiers.double_duplicate.value(1, "ID"),
    );
    assert_eq!(
        result.tiers.double_duplicate.value(0, "ID"),
        Some("WMHP4581642.00Echo ")
    );

    // Unique records keep their base key untouched
    assert_eq!(
        result.tiers.unique.value(0, "ID"),
        Some("GLEP4581575.50")
    );
}

#[test]
fn unkeyed_records_survive_into_the_cleaned_tier() {
    let result = load_and_run();
    let unique = &result.tiers.unique;

    assert_eq!(unique.value(1, "ACCOUNT_NAME"), Some("SCP"));
    assert_eq!(unique.value(1, "DATE"), None);
    assert_eq!(unique.value(1, "ID"), None);
}

#[test]
fn export_suppresses_only_the_blank_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("PROCESSED_bank-export.xlsx");

    let result = load_and_run();
    let summary = xlsx::export(&result, &path, &TriageConfig::default()).unwrap();

    assert_eq!(summary.sheets_written, 3);
    // 6 data rows survive; the all-blank row is a render-level drop
    assert_eq!(summary.rows_written, 6);
    assert_eq!(summary.rows_suppressed, 1);
    assert!(path.exists());
}
