//! # Fixed-Width Field Codec
//!
//! Positional read/verify/write primitives over fixed-width text lines.
//!
//! The read side threads a validity flag through every field: a failed field
//! clears the flag and emits a structured warning, but later fields are
//! still extracted so the log output carries every bad column offset, not
//! just the first. Malformed data never panics and never raises an error.
//!
//! Cursor rule (applied uniformly): the cursor advances by the field length
//! whenever enough characters remain — even when the content fails
//! validation — and never advances when they don't. Downstream field offsets
//! therefore stay stable across content errors.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::str::FromStr;
use tracing::warn;

/// Log context identifying the record being decoded.
#[derive(Debug, Clone, Copy)]
pub struct RecordContext<'a> {
    pub record_type: &'a str,
    pub line_number: usize,
    pub file_name: &'a str,
}

/// Cursor + validity flag over one fixed-width line.
pub struct FieldReader<'a> {
    record: &'a str,
    position: usize,
    valid: bool,
    context: RecordContext<'a>,
}

impl<'a> FieldReader<'a> {
    pub fn new(record: &'a str, context: RecordContext<'a>) -> Self {
        Self {
            record,
            position: 0,
            valid: true,
            context,
        }
    }

    /// True while every field so far validated cleanly.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether at least `length` characters remain past the cursor.
    pub fn has_remaining(&self, length: usize) -> bool {
        self.position + length <= self.record.len()
    }

    fn fail(&mut self, field: &str, reason: &str) {
        warn!(
            record_type = self.context.record_type,
            line = self.context.line_number,
            file = self.context.file_name,
            field,
            position = self.position,
            reason,
            "Record field failed validation"
        );
        self.valid = false;
    }

    /// Slice the next `length` characters, advancing the cursor when enough
    /// remain. Returns `None` (without advancing) on a truncated record.
    fn take(&mut self, length: usize, field: &str) -> Option<&'a str> {
        let start = self.position;
        let end = start + length;
        if end > self.record.len() {
            self.fail(field, "unexpected end of record");
            return None;
        }
        self.position = end;
        match self.record.get(start..end) {
            Some(slice) => Some(slice),
            None => {
                // Multi-byte characters straddling the field boundary;
                // partner feeds are ASCII so this is corrupt input.
                self.fail(field, "field is not valid single-byte text");
                None
            }
        }
    }

    /// Verify a fixed literal occupies the next `length` positions.
    pub fn verify_literal(&mut self, expected: &str, field: &str) -> bool {
        if let Some(slice) = self.take(expected.len(), field) {
            if slice != expected {
                self.fail(field, "literal mismatch");
            }
        }
        self.valid
    }

    /// Extract exactly `length` characters, trimmed when requested.
    pub fn read_string(&mut self, length: usize, trim: bool, field: &str) -> Option<String> {
        let slice = self.take(length, field)?;
        if trim {
            Some(slice.trim().to_string())
        } else {
            Some(slice.to_string())
        }
    }

    /// Extract a fixed-width integer field (zero-padded or space-padded).
    pub fn read_long(&mut self, length: usize, field: &str) -> Option<i64> {
        let slice = self.take(length, field)?;
        match slice.trim().parse::<i64>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.fail(field, "not a valid integer");
                None
            }
        }
    }

    /// Extract a fixed-width decimal field carrying an explicit decimal
    /// point (or none, for whole values).
    pub fn read_decimal(&mut self, length: usize, field: &str) -> Option<BigDecimal> {
        let slice = self.take(length, field)?;
        match BigDecimal::from_str(slice.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                self.fail(field, "not a valid decimal");
                None
            }
        }
    }

    /// Extract a fixed-width digit run with implied decimal places (the
    /// wire format carries no decimal point; e.g. 13 digits of cents).
    pub fn read_implied_decimal(
        &mut self,
        length: usize,
        implied_places: u32,
        field: &str,
    ) -> Option<BigDecimal> {
        let units = self.read_long(length, field)?;
        let divisor = 10i64.pow(implied_places);
        Some(BigDecimal::from(units) / BigDecimal::from(divisor))
    }

    /// Extract a date-only field of the given width and chrono format
    /// (`%Y%m%d` for 8-character fields, `%m%d%y` for 6-character fields).
    pub fn read_date(&mut self, length: usize, format: &str, field: &str) -> Option<NaiveDate> {
        let slice = self.take(length, field)?;
        match NaiveDate::parse_from_str(slice, format) {
            Ok(date) => Some(date),
            Err(_) => {
                self.fail(field, "not a valid calendar date");
                None
            }
        }
    }

    /// Extract a 4-character `HHmm` time field and combine it with a
    /// previously extracted date into a single timestamp.
    pub fn read_time_with_date(
        &mut self,
        date: Option<NaiveDate>,
        field: &str,
    ) -> Option<NaiveDateTime> {
        let slice = self.take(4, field)?;
        let time = match NaiveTime::parse_from_str(slice, "%H%M") {
            Ok(time) => time,
            Err(_) => {
                self.fail(field, "not a valid time of day");
                return None;
            }
        };
        // A missing date has already cleared the validity flag; the time
        // column was still consumed so later offsets hold.
        date.map(|d| d.and_time(time))
    }

    /// Validate that a fixed-length trailing filler region exists. Used to
    /// detect truncated trailer records.
    pub fn verify_record_end(&mut self, filler_length: usize, required: bool) -> bool {
        if self.has_remaining(filler_length) {
            self.position += filler_length;
        } else if required {
            self.fail("filler", "truncated record end");
        }
        self.valid
    }
}

/// Builds one fixed-width output line. Alpha fields are left-justified and
/// space-padded, numeric fields right-justified and zero-padded, omitted
/// fields filled per their class (spaces for alpha/date, zeros for numeric).
#[derive(Debug, Default)]
pub struct FieldWriter {
    line: String,
}

impl FieldWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            line: String::with_capacity(capacity),
        }
    }

    pub fn push_literal(&mut self, literal: &str) -> &mut Self {
        self.line.push_str(literal);
        self
    }

    /// Left-justified, space-padded, truncated to the field width.
    pub fn push_alpha(&mut self, value: &str, length: usize) -> &mut Self {
        self.line
            .push_str(&format!("{value:<length$.length$}", length = length));
        self
    }

    /// Right-justified, zero-padded. Overlong values keep their rightmost
    /// digits so the field width is never exceeded.
    pub fn push_numeric(&mut self, value: i64, length: usize) -> &mut Self {
        let rendered = format!("{value:0>length$}", length = length);
        let start = rendered.len() - length;
        self.line.push_str(&rendered[start..]);
        self
    }

    /// Zero fill for an omitted numeric field.
    pub fn push_omitted_numeric(&mut self, length: usize) -> &mut Self {
        self.push_filler(length, '0')
    }

    /// Date rendered through the given chrono format; space fill when
    /// omitted.
    pub fn push_date(
        &mut self,
        date: Option<NaiveDate>,
        format: &str,
        length: usize,
    ) -> &mut Self {
        match date {
            Some(date) => {
                let rendered = date.format(format).to_string();
                self.push_alpha(&rendered, length)
            }
            None => self.push_filler(length, ' '),
        }
    }

    pub fn push_filler(&mut self, length: usize, fill: char) -> &mut Self {
        self.line.extend(std::iter::repeat(fill).take(length));
        self
    }

    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    pub fn finish(self) -> String {
        self.line
    }
}
