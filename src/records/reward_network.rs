//! # Reward Network Merchant Feed
//!
//! Inbound merchant identity/location records for the merchant catalog.
//! 300-byte fixed records: a header, one detail per merchant, and a trailer
//! declaring the record count.
//!
//! Unlike the clearing parser, this feed validates fail-closed: if the
//! trailer count disagrees with the parsed merchant count, or the header and
//! trailer creation dates differ, the whole result is discarded. The
//! partner's downstream catalog ingestion depends on this strictness, so it
//! is deliberately not unified with the clearing parser's leniency.

use chrono::NaiveDate;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use crate::error::Result;

use super::codec::{FieldReader, RecordContext};

/// Every merchant feed record is exactly this many characters.
pub const REWARD_NETWORK_RECORD_LENGTH: usize = 300;

/// Fixed description literal carried by header and trailer records.
pub const FILE_DESCRIPTION: &str = "RESTAURANT DATA";

#[derive(Debug, Clone, PartialEq)]
pub struct RewardNetworkHeader {
    pub creation_date: NaiveDate,
    pub sequence_number: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RewardNetworkTrailer {
    pub creation_date: NaiveDate,
    pub sequence_number: i64,
    pub record_count: i64,
}

/// One merchant identity/location record.
#[derive(Debug, Clone, PartialEq)]
pub struct Merchant {
    pub merchant_id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub url: String,
    pub visa_mid: String,
    pub visa_sid: String,
    pub mastercard_location_id: String,
    pub mastercard_acquirer_mid: String,
    pub reward_network_acquirer_id: String,
}

/// Parse a header record: `H` + description(15) + date(8, yyyyMMdd) +
/// sequence(5) + filler(271).
pub fn parse_header(
    line: &str,
    line_number: usize,
    file_name: &str,
) -> Option<RewardNetworkHeader> {
    let mut reader = FieldReader::new(
        line,
        RecordContext {
            record_type: "reward_network_header",
            line_number,
            file_name,
        },
    );

    reader.verify_literal("H", "record_type");
    reader.verify_literal(FILE_DESCRIPTION, "description");
    let creation_date = reader.read_date(8, "%Y%m%d", "creation_date");
    let sequence_number = reader.read_long(5, "sequence_number");
    reader.verify_record_end(271, true);

    if !reader.is_valid() {
        return None;
    }
    Some(RewardNetworkHeader {
        creation_date: creation_date?,
        sequence_number: sequence_number?,
    })
}

/// Parse a detail record. Widths are the wire contract: `D` + merchant
/// id(9) + name(68) + address(30) + city(20) + state(2) + zip(5) + url(75) +
/// Visa MID(10) + Visa SID(10) + MC location id(9) + MC acquirer MID(15) +
/// RN acquirer id(20) + filler(26).
pub fn parse_detail(line: &str, line_number: usize, file_name: &str) -> Option<Merchant> {
    let mut reader = FieldReader::new(
        line,
        RecordContext {
            record_type: "reward_network_detail",
            line_number,
            file_name,
        },
    );

    reader.verify_literal("D", "record_type");
    let merchant_id = reader.read_string(9, true, "merchant_id");
    let name = reader.read_string(68, true, "name");
    let address = reader.read_string(30, true, "address");
    let city = reader.read_string(20, true, "city");
    let state = reader.read_string(2, true, "state");
    let zip = reader.read_string(5, true, "zip");
    let url = reader.read_string(75, true, "url");
    let visa_mid = reader.read_string(10, true, "visa_mid");
    let visa_sid = reader.read_string(10, true, "visa_sid");
    let mc_location_id = reader.read_string(9, true, "mastercard_location_id");
    let mc_acquirer_mid = reader.read_string(15, true, "mastercard_acquirer_mid");
    let rn_acquirer_id = reader.read_string(20, true, "reward_network_acquirer_id");
    reader.verify_record_end(26, true);

    if !reader.is_valid() {
        return None;
    }
    Some(Merchant {
        merchant_id: merchant_id?,
        name: name?,
        address: address?,
        city: city?,
        state: state?,
        zip: zip?,
        url: url?,
        visa_mid: visa_mid?,
        visa_sid: visa_sid?,
        mastercard_location_id: mc_location_id?,
        mastercard_acquirer_mid: mc_acquirer_mid?,
        reward_network_acquirer_id: rn_acquirer_id?,
    })
}

/// Parse a trailer record: `T` + description(15) + date(8) + sequence(5) +
/// record count(7) + filler(264).
pub fn parse_trailer(
    line: &str,
    line_number: usize,
    file_name: &str,
) -> Option<RewardNetworkTrailer> {
    let mut reader = FieldReader::new(
        line,
        RecordContext {
            record_type: "reward_network_trailer",
            line_number,
            file_name,
        },
    );

    reader.verify_literal("T", "record_type");
    reader.verify_literal(FILE_DESCRIPTION, "description");
    let creation_date = reader.read_date(8, "%Y%m%d", "creation_date");
    let sequence_number = reader.read_long(5, "sequence_number");
    let record_count = reader.read_long(7, "record_count");
    reader.verify_record_end(264, true);

    if !reader.is_valid() {
        return None;
    }
    Some(RewardNetworkTrailer {
        creation_date: creation_date?,
        sequence_number: sequence_number?,
        record_count: record_count?,
    })
}

/// Strict fail-closed merchant feed parser.
#[derive(Debug, Default)]
pub struct RewardNetworkFileParser;

impl RewardNetworkFileParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a merchant feed end to end.
    ///
    /// Returns `Ok(Some(merchants))` only when the trailer-declared count
    /// matches the parsed merchant count and the header creation date
    /// matches the trailer's. Any cross-validation mismatch returns
    /// `Ok(None)` and the parsed records are discarded. `Err` only when the
    /// stream itself fails.
    pub async fn import_merchants<R>(
        &self,
        reader: R,
        file_name: &str,
    ) -> Result<Option<Vec<Merchant>>>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut header: Option<RewardNetworkHeader> = None;
        let mut trailer: Option<RewardNetworkTrailer> = None;
        let mut merchants: Vec<Merchant> = Vec::new();
        let mut lines = reader.lines();
        let mut line_number = 0usize;

        while let Some(line) = lines.next_line().await? {
            line_number += 1;

            if line.len() < REWARD_NETWORK_RECORD_LENGTH {
                warn!(
                    file = file_name,
                    line = line_number,
                    length = line.len(),
                    "Unexpected end of record; line skipped"
                );
                continue;
            }

            match line.chars().next() {
                Some('H') => {
                    if header.is_some() {
                        warn!(
                            file = file_name,
                            line = line_number,
                            "Duplicate header record ignored"
                        );
                    } else {
                        header = parse_header(&line, line_number, file_name);
                    }
                }
                Some('D') => {
                    // A detail that fails field validation is dropped; the
                    // trailer count check then fails the whole file.
                    if let Some(merchant) = parse_detail(&line, line_number, file_name) {
                        merchants.push(merchant);
                    }
                }
                Some('T') => {
                    if trailer.is_some() {
                        warn!(
                            file = file_name,
                            line = line_number,
                            "Duplicate trailer record ignored"
                        );
                    } else {
                        trailer = parse_trailer(&line, line_number, file_name);
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

        let Some(header) = header else {
            warn!(file = file_name, "No header record parsed; feed rejected");
            return Ok(None);
        };
        let Some(trailer) = trailer else {
            warn!(file = file_name, "No trailer record parsed; feed rejected");
            return Ok(None);
        };

        if trailer.record_count != merchants.len() as i64 {
            warn!(
                file = file_name,
                declared = trailer.record_count,
                actual = merchants.len(),
                "Trailer record count mismatch; feed rejected"
            );
            return Ok(None);
        }
        if header.creation_date != trailer.creation_date {
            warn!(
                file = file_name,
                header_date = %header.creation_date,
                trailer_date = %trailer.creation_date,
                "Header and trailer creation dates differ; feed rejected"
            );
            return Ok(None);
        }

        crate::logging::log_feed_operation(
            "import_merchants",
            file_name,
            Some(merchants.len()),
            "accepted",
            None,
        );
        Ok(Some(merchants))
    }
}
