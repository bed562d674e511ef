//! Conversion of raw CSV rows into typed records.
//!
//! Rows arrive as a mapping of column name to raw string. Numeric and date
//! columns are coerced here; the multi-valued `artists` and `artist_genres`
//! columns hold Python-style list literals (`['A','B']`) that are decoded
//! into `Vec<String>`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use tracing::{debug, warn};
use tunechart_common::Record;

/// One CSV row keyed by column name.
pub type RawRow = HashMap<String, String>;

/// Date column.
pub const DATE_COLUMN: &str = "date";
/// Stream count column.
pub const STREAMS_COLUMN: &str = "streams";
/// Country columns, in lookup order.
pub const COUNTRY_COLUMNS: [&str; 2] = ["country_fullname", "country"];
/// Artist list column.
pub const ARTISTS_COLUMN: &str = "artists";
/// Genre list column.
pub const GENRES_COLUMN: &str = "artist_genres";
/// Track name columns, in lookup order.
pub const TRACK_COLUMNS: [&str; 3] = ["track_name", "name", "trackName"];

/// Outcome of decoding a multi-valued field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListField {
    /// The field decoded cleanly (possibly to an empty list).
    Parsed(Vec<String>),
    /// The field was malformed; the record gets an empty list.
    Malformed,
}

impl ListField {
    /// The decoded values, empty when malformed.
    pub fn into_values(self) -> Vec<String> {
        match self {
            Self::Parsed(values) => values,
            Self::Malformed => Vec::new(),
        }
    }

    /// Whether decoding failed.
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed)
    }
}

/// Result of parsing one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    /// The record, or `None` when the row was dropped.
    pub record: Option<Record>,
    /// Number of multi-valued fields that were malformed.
    pub malformed_fields: usize,
}

/// Parses a raw row into a record.
///
/// Rows without a valid date are dropped. A malformed list field is logged
/// and replaced by an empty list; it never fails the row.
pub fn parse_row(row: &RawRow) -> ParsedRow {
    let raw_date = field(row, DATE_COLUMN);
    let Some(date) = parse_date(raw_date) else {
        debug!(date = raw_date, "Dropping row with invalid date");
        return ParsedRow {
            record: None,
            malformed_fields: 0,
        };
    };

    let mut malformed_fields = 0;
    let mut list = |column: &str| {
        let raw = field(row, column);
        let parsed = parse_list_field(raw);
        if parsed.is_malformed() {
            malformed_fields += 1;
            warn!(column, value = raw, "Malformed list field, using an empty list");
        }
        parsed.into_values()
    };
    let artists = list(ARTISTS_COLUMN);
    let genres = list(GENRES_COLUMN);

    let record = Record {
        date,
        streams: parse_streams(field(row, STREAMS_COLUMN)),
        country: first_field(row, &COUNTRY_COLUMNS).to_string(),
        artists,
        genres,
        track_name: first_field(row, &TRACK_COLUMNS).to_string(),
    };

    ParsedRow {
        record: Some(record),
        malformed_fields,
    }
}

/// Parses a raw row, discarding the malformed-field count.
pub fn parse_record(row: &RawRow) -> Option<Record> {
    parse_row(row).record
}

/// Coerces a stream count. Accepts non-negative integers and finite
/// non-negative decimals (truncated); anything else is `None`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn parse_streams(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u64>() {
        return Some(value);
    }

    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value <= u64::MAX as f64 {
        Some(value.trunc() as u64)
    } else {
        None
    }
}

/// Parses an ISO-like date: `YYYY-MM-DD`, RFC 3339, or a date-time with a
/// `T` or space separator. Only the calendar date is kept.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|datetime| datetime.date())
}

/// Decodes a multi-valued field.
///
/// Values shaped like `['A','B']` have their single quotes swapped for
/// double quotes and are read as a JSON string array. Values that are
/// already valid JSON arrays are read as-is. A non-empty value without a
/// leading `[` is a single name and becomes a one-element list.
pub fn parse_list_field(raw: &str) -> ListField {
    let raw = raw.trim();
    if raw.is_empty() {
        return ListField::Parsed(Vec::new());
    }
    if !raw.starts_with('[') {
        return ListField::Parsed(vec![raw.to_string()]);
    }

    let decoded = serde_json::from_str::<Vec<String>>(raw)
        .or_else(|_| serde_json::from_str::<Vec<String>>(&raw.replace('\'', "\"")));

    match decoded {
        Ok(values) => ListField::Parsed(
            values
                .into_iter()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .collect(),
        ),
        Err(_) => ListField::Malformed,
    }
}

fn field<'a>(row: &'a RawRow, column: &str) -> &'a str {
    row.get(column).map_or("", String::as_str)
}

fn first_field<'a>(row: &'a RawRow, columns: &[&str]) -> &'a str {
    columns
        .iter()
        .filter_map(|column| row.get(*column))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .unwrap_or("")
}
