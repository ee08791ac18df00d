//! # MasterCard Clearing File
//!
//! Inbound settlement extract: one 200-character record per line, a header,
//! any number of data records, and a trailer carrying the declared record
//! count. Parsing degrades gracefully — structural problems are logged and
//! the aggregate is still returned, so downstream reconciliation can work
//! with whatever decoded cleanly.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::error::Result;

use super::codec::{FieldReader, RecordContext};

/// Every clearing record is exactly this many characters.
pub const CLEARING_RECORD_LENGTH: usize = 200;

const HEADER_CODE: char = 'H';
const DATA_CODE: char = 'D';
const TRAILER_CODE: char = 'T';

#[derive(Debug, Clone, PartialEq)]
pub struct ClearingHeader {
    pub file_date: NaiveDate,
    pub member_ica: String,
}

/// One cleared card transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearingDataRecord {
    pub transaction_sequence_number: i64,
    pub bank_account_number: String,
    pub transaction_amount: BigDecimal,
    pub transaction_timestamp: NaiveDateTime,
    pub merchant_dba_name: String,
    pub merchant_id: String,
    pub location_id: String,
    pub issuer_ica: String,
    pub banknet_reference_number: String,
    pub bank_customer_number: String,
    pub aggregate_merchant_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClearingTrailer {
    pub record_count: i64,
    pub member_ica: String,
}

/// Aggregate parse result. `data_records` keeps a `None` placeholder for
/// each positionally-present but corrupt data line, so consumers see the
/// file's true shape and can log/skip the gaps.
#[derive(Debug, Default)]
pub struct ClearingFile {
    pub header: Option<ClearingHeader>,
    pub data_records: Vec<Option<ClearingDataRecord>>,
    pub trailer: Option<ClearingTrailer>,
}

/// Parse a header record: `H` + file date(8, yyyyMMdd) + member ICA(11) +
/// filler(180).
pub fn parse_header(line: &str, line_number: usize, file_name: &str) -> Option<ClearingHeader> {
    let mut reader = FieldReader::new(
        line,
        RecordContext {
            record_type: "clearing_header",
            line_number,
            file_name,
        },
    );

    reader.verify_literal("H", "record_type");
    let file_date = reader.read_date(8, "%Y%m%d", "file_date");
    let member_ica = reader.read_string(11, true, "member_ica");
    reader.verify_record_end(180, true);

    if !reader.is_valid() {
        return None;
    }
    Some(ClearingHeader {
        file_date: file_date?,
        member_ica: member_ica?,
    })
}

/// Parse a data record. Field order and widths are the partner wire
/// contract; the 6-character date and the later 4-character time combine
/// into one transaction timestamp.
pub fn parse_data_record(
    line: &str,
    line_number: usize,
    file_name: &str,
) -> Option<ClearingDataRecord> {
    let mut reader = FieldReader::new(
        line,
        RecordContext {
            record_type: "clearing_data",
            line_number,
            file_name,
        },
    );

    reader.verify_literal("D", "record_type");
    let sequence = reader.read_long(13, "transaction_sequence_number");
    let account = reader.read_string(19, true, "bank_account_number");
    let amount = reader.read_implied_decimal(13, 2, "transaction_amount");
    let date = reader.read_date(6, "%m%d%y", "transaction_date");
    let dba_name = reader.read_string(60, true, "merchant_dba_name");
    let merchant_id = reader.read_string(22, true, "merchant_id");
    let location_id = reader.read_string(9, true, "location_id");
    let issuer_ica = reader.read_string(6, true, "issuer_ica");
    let timestamp = reader.read_time_with_date(date, "transaction_time");
    let banknet = reader.read_string(9, true, "banknet_reference_number");
    let customer = reader.read_string(30, true, "bank_customer_number");
    let aggregate_merchant = reader.read_string(6, true, "aggregate_merchant_id");
    reader.verify_record_end(2, true);

    if !reader.is_valid() {
        return None;
    }
    Some(ClearingDataRecord {
        transaction_sequence_number: sequence?,
        bank_account_number: account?,
        transaction_amount: amount?,
        transaction_timestamp: timestamp?,
        merchant_dba_name: dba_name?,
        merchant_id: merchant_id?,
        location_id: location_id?,
        issuer_ica: issuer_ica?,
        banknet_reference_number: banknet?,
        bank_customer_number: customer?,
        aggregate_merchant_id: aggregate_merchant?,
    })
}

/// Parse a trailer record: `T` + record count(12) + member ICA(11) +
/// blank filler(176).
pub fn parse_trailer(line: &str, line_number: usize, file_name: &str) -> Option<ClearingTrailer> {
    let mut reader = FieldReader::new(
        line,
        RecordContext {
            record_type: "clearing_trailer",
            line_number,
            file_name,
        },
    );

    reader.verify_literal("T", "record_type");
    let record_count = reader.read_long(12, "record_count");
    let member_ica = reader.read_string(11, true, "member_ica");
    reader.verify_record_end(176, true);

    if !reader.is_valid() {
        return None;
    }
    Some(ClearingTrailer {
        record_count: record_count?,
        member_ica: member_ica?,
    })
}

/// Line-by-line clearing file parser. Per-call state is local, so one
/// parser value may serve concurrent parses of different streams.
#[derive(Debug, Default)]
pub struct ClearingFileParser;

impl ClearingFileParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a clearing feed end to end.
    ///
    /// Returns `Err` only when the stream itself fails; every data-level
    /// problem is logged and the (possibly partial) aggregate is still
    /// returned.
    pub async fn parse<R>(&self, reader: R, file_name: &str) -> Result<ClearingFile>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut file = ClearingFile::default();
        let mut lines = reader.lines();
        let mut line_number = 0usize;
        let mut header_count = 0usize;
        let mut trailer_found = false;
        let mut after_trailer_logged = false;

        while let Some(line) = lines.next_line().await? {
            line_number += 1;

            if line.len() < CLEARING_RECORD_LENGTH {
                warn!(
                    file = file_name,
                    line = line_number,
                    length = line.len(),
                    "Unexpected end of record; line skipped"
                );
                continue;
            }

            if trailer_found && !after_trailer_logged {
                warn!(
                    file = file_name,
                    line = line_number,
                    "Records found after the trailer record"
                );
                after_trailer_logged = true;
            }

            match line.chars().next() {
                Some(HEADER_CODE) => {
                    if line_number > 1 {
                        warn!(
                            file = file_name,
                            line = line_number,
                            "Header record out of order; expected on the first line"
                        );
                    }
                    if header_count == 0 {
                        file.header = parse_header(&line, line_number, file_name);
                    } else {
                        warn!(
                            file = file_name,
                            line = line_number,
                            "Duplicate header record ignored"
                        );
                    }
                    header_count += 1;
                }
                Some(DATA_CODE) => {
                    // A None placeholder keeps corrupt-but-present records
                    // visible to consumers.
                    file.data_records
                        .push(parse_data_record(&line, line_number, file_name));
                }
                Some(TRAILER_CODE) => {
                    if trailer_found {
                        warn!(
                            file = file_name,
                            line = line_number,
                            "Duplicate trailer record ignored"
                        );
                    } else {
                        file.trailer = parse_trailer(&line, line_number, file_name);
                        trailer_found = true;
                    }
                }
                Some(code) => {
                    warn!(
                        file = file_name,
                        line = line_number,
                        code = %code,
                        "Unrecognized record type; line skipped"
                    );
                }
                None => {
                    warn!(
                        file = file_name,
                        line = line_number,
                        "Unexpected end of record; line skipped"
                    );
                }
            }
        }

        self.validate(&file, file_name);
        crate::logging::log_feed_operation(
            "parse_clearing",
            file_name,
            Some(file.data_records.len()),
            "completed",
            None,
        );
        Ok(file)
    }

    /// Post-loop cross-validation. Warnings only — the degrade-gracefully
    /// policy means the aggregate is returned regardless.
    fn validate(&self, file: &ClearingFile, file_name: &str) {
        if file.header.is_none() {
            warn!(file = file_name, "No header record parsed");
        }
        if file.data_records.is_empty() {
            info!(file = file_name, "Clearing file contains no data records");
        }
        match &file.trailer {
            None => warn!(file = file_name, "No trailer record parsed"),
            Some(trailer) => {
                let actual = file.data_records.len() as i64;
                if trailer.record_count != actual {
                    warn!(
                        file = file_name,
                        declared = trailer.record_count,
                        actual,
                        "Trailer record count does not match parsed data records"
                    );
                }
            }
        }
    }
}
