//! Outbound filtering file construction: determinism, record pairing, and
//! trailer counts.

mod common;

use chrono::NaiveDate;

use cardlink_core::records::{FilteringFileBuilder, FilteringRecord};

fn submission_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
}

fn sample_records() -> Vec<FilteringRecord> {
    vec![
        FilteringRecord {
            bank_account_number: "ACCT000000000000001".to_string(),
            bank_customer_number: "CUST000000000000000000000001".to_string(),
            merchant_id: "MERCH000000000000001".to_string(),
            location_id: Some("LOC000001".to_string()),
        },
        FilteringRecord {
            bank_account_number: "ACCT000000000000002".to_string(),
            bank_customer_number: "CUST000000000000000000000002".to_string(),
            merchant_id: "MERCH000000000000002".to_string(),
            location_id: None,
        },
    ]
}

#[test]
fn identical_inputs_produce_byte_identical_output() {
    let builder = FilteringFileBuilder::new();
    let first = builder.build(&sample_records(), submission_date(), "MAP0000001", "SET0000001");
    let second = builder.build(&sample_records(), submission_date(), "MAP0000001", "SET0000001");
    assert_eq!(first, second);
}

#[test]
fn file_shape_is_header_pairs_trailer() {
    let output = FilteringFileBuilder::new().build(
        &sample_records(),
        submission_date(),
        "MAP0000001",
        "SET0000001",
    );

    let lines: Vec<&str> = output.lines().collect();
    // header + 2 records per input + trailer
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with('H'));
    assert!(lines[1].starts_with('A'));
    assert!(lines[2].starts_with('C'));
    assert!(lines[3].starts_with('A'));
    assert!(lines[4].starts_with('C'));
    assert!(lines[5].starts_with('T'));
    assert!(lines.iter().all(|line| line.len() == 200));
}

#[test]
fn line_endings_are_unix_only() {
    let output = FilteringFileBuilder::new().build(
        &sample_records(),
        submission_date(),
        "MAP0000001",
        "SET0000001",
    );
    assert!(!output.contains('\r'));
    assert!(output.ends_with('\n'));
}

#[test]
fn trailer_count_covers_pairs_plus_header_and_trailer() {
    let records = sample_records();
    let output = FilteringFileBuilder::new().build(
        &records,
        submission_date(),
        "MAP0000001",
        "SET0000001",
    );

    let trailer = output.lines().last().unwrap();
    let declared: i64 = trailer[1..13].parse().unwrap();
    assert_eq!(declared, (2 * records.len() + 2) as i64);
}

#[test]
fn empty_input_still_produces_header_and_trailer() {
    let output =
        FilteringFileBuilder::new().build(&[], submission_date(), "MAP0000001", "SET0000001");

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    let declared: i64 = lines[1][1..13].parse().unwrap();
    assert_eq!(declared, 2);
}

#[test]
fn header_carries_submission_date_and_identifiers() {
    let output = FilteringFileBuilder::new().build(
        &sample_records(),
        submission_date(),
        "MAP0000001",
        "SET0000001",
    );

    let header = output.lines().next().unwrap();
    assert_eq!(&header[1..9], "20240520");
    assert_eq!(&header[9..19], "MAP0000001");
    assert_eq!(&header[19..29], "SET0000001");
}

#[test]
fn omitted_location_is_space_filled() {
    let output = FilteringFileBuilder::new().build(
        &sample_records(),
        submission_date(),
        "MAP0000001",
        "SET0000001",
    );

    // second input pair has no location id; field spans positions 72..81
    let auth_line = output.lines().nth(3).unwrap();
    assert_eq!(&auth_line[72..81], " ".repeat(9));
}
