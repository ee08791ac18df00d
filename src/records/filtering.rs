//! # MasterCard Filtering File
//!
//! Outbound registration file telling the network which cards and merchants
//! to monitor for offer-qualifying transactions. Each registered input
//! produces a paired authorization record and clearing record; the trailer
//! count therefore reflects `2 * inputs + 2` (header and trailer included).
//!
//! Output is byte-deterministic for a given input set and submission date,
//! with explicit Unix line endings. Field widths mirror the parse-side
//! conventions: alpha fields space-filled, numeric fields zero-filled,
//! omitted dates space-filled.

use chrono::NaiveDate;

use super::codec::FieldWriter;

/// Every filtering record is exactly this many characters.
pub const FILTERING_RECORD_LENGTH: usize = 200;

const AUTHORIZATION_CODE: &str = "A";
const CLEARING_CODE: &str = "C";

/// One card/merchant registration to monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteringRecord {
    pub bank_account_number: String,
    pub bank_customer_number: String,
    pub merchant_id: String,
    /// Absent for merchant-wide registrations; rendered as space filler.
    pub location_id: Option<String>,
}

/// Header: `H` + submission date(8, yyyyMMdd) + mapping id(10) +
/// set id(10) + filler(171).
pub fn build_header(submission_date: NaiveDate, mapping_id: &str, set_id: &str) -> String {
    let mut writer = FieldWriter::with_capacity(FILTERING_RECORD_LENGTH);
    writer
        .push_literal("H")
        .push_date(Some(submission_date), "%Y%m%d", 8)
        .push_alpha(mapping_id, 10)
        .push_alpha(set_id, 10)
        .push_filler(171, ' ');
    writer.finish()
}

/// Authorization-side registration record.
pub fn build_authorization_record(record: &FilteringRecord, submission_date: NaiveDate) -> String {
    build_registration_record(AUTHORIZATION_CODE, record, submission_date)
}

/// Clearing-side registration record; same body as the authorization
/// record under a different type code.
pub fn build_clearing_record(record: &FilteringRecord, submission_date: NaiveDate) -> String {
    build_registration_record(CLEARING_CODE, record, submission_date)
}

fn build_registration_record(
    code: &str,
    record: &FilteringRecord,
    submission_date: NaiveDate,
) -> String {
    let mut writer = FieldWriter::with_capacity(FILTERING_RECORD_LENGTH);
    writer
        .push_literal(code)
        .push_alpha(&record.bank_account_number, 19)
        .push_alpha(&record.bank_customer_number, 30)
        .push_alpha(&record.merchant_id, 22)
        .push_alpha(record.location_id.as_deref().unwrap_or(""), 9)
        .push_date(Some(submission_date), "%Y%m%d", 8)
        // amount threshold is unused by this program; numeric omission is
        // zero fill
        .push_omitted_numeric(13)
        .push_filler(98, ' ');
    writer.finish()
}

/// Trailer: `T` + record count(12) + filler(187). The count covers every
/// line in the file including the header and the trailer itself.
pub fn build_trailer(input_count: usize) -> String {
    let mut writer = FieldWriter::with_capacity(FILTERING_RECORD_LENGTH);
    writer
        .push_literal("T")
        .push_numeric((2 * input_count + 2) as i64, 12)
        .push_filler(187, ' ');
    writer.finish()
}

/// Assembles a complete outbound filtering file.
#[derive(Debug, Default)]
pub struct FilteringFileBuilder;

impl FilteringFileBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the full file text: header, one authorization/clearing pair
    /// per input, trailer. Lines end with `\n` explicitly (never the
    /// platform newline) and the output is identical for identical inputs.
    pub fn build(
        &self,
        records: &[FilteringRecord],
        submission_date: NaiveDate,
        mapping_id: &str,
        set_id: &str,
    ) -> String {
        // +1 for the newline on every line
        let mut output =
            String::with_capacity((2 * records.len() + 2) * (FILTERING_RECORD_LENGTH + 1));

        output.push_str(&build_header(submission_date, mapping_id, set_id));
        output.push('\n');
        for record in records {
            output.push_str(&build_authorization_record(record, submission_date));
            output.push('\n');
            output.push_str(&build_clearing_record(record, submission_date));
            output.push('\n');
        }
        output.push_str(&build_trailer(records.len()));
        output.push('\n');

        output
    }
}
