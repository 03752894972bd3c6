//! Turns loosely typed rows into a strictly typed series of [`DataPoint`]s.
//!
//! Normalization is all-or-nothing: the first malformed row aborts the batch
//! with a [`ParseError`] naming its index. Row order is preserved exactly;
//! nothing is sorted, dropped or deduplicated.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{
    errors::ParseError,
    models::{
        data_point::DataPoint,
        raw_record::{FieldValue, RawRecord, RawValue, columns},
    },
};

/// Date-time layouts carrying an explicit UTC offset (e.g. pandas CSV exports).
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%z",
];

/// Date-time layouts without an offset; read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Normalizes every row, in order.
///
/// An empty input yields an empty series.
pub fn normalize(rows: &[RawRecord]) -> Result<Vec<DataPoint>, ParseError> {
    rows.iter()
        .enumerate()
        .map(|(row, record)| normalize_row(row, record))
        .collect()
}

/// Normalizes a single row; `row` is only used for error reporting.
pub fn normalize_row(row: usize, record: &RawRecord) -> Result<DataPoint, ParseError> {
    let datetime = record
        .get(columns::DATETIME)
        .and_then(parse_datetime)
        .ok_or(ParseError::InvalidDatetime { row })?;

    let required = |field: &'static str| match record.field(field) {
        FieldValue::Valid(value) => Ok(value),
        FieldValue::Missing | FieldValue::Invalid => Err(ParseError::InvalidNumeric { row, field }),
    };
    // Absent key means zero; a present key must hold a number, even if null.
    let optional = |field: &'static str| match record.field(field) {
        FieldValue::Valid(value) => Ok(value),
        FieldValue::Missing => Ok(0.0),
        FieldValue::Invalid => Err(ParseError::InvalidNumeric { row, field }),
    };

    let point = DataPoint::new(
        datetime,
        required(columns::OPEN)?,
        required(columns::HIGH)?,
        required(columns::LOW)?,
        required(columns::CLOSE)?,
        required(columns::VOLUME)?,
        required(columns::P_BUY)?,
    )
    .with_sell_side(
        optional(columns::P_SELL)?,
        optional(columns::PRICE_DIFF)?,
        optional(columns::RETURN)?,
    );

    Ok(point)
}

/// Reads a timestamp from a cell.
///
/// Numbers are Unix epoch milliseconds. Text may be RFC 3339, a date-time with
/// or without offset (offset-less values are UTC), or a bare date (UTC midnight).
pub fn parse_datetime(value: &RawValue) -> Option<DateTime<Utc>> {
    match value {
        RawValue::Number(millis) if millis.is_finite() => {
            DateTime::from_timestamp_millis(millis.trunc() as i64)
        }
        RawValue::Text(text) => parse_datetime_str(text.trim()),
        _ => None,
    }
}

fn parse_datetime_str(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt.and_utc());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
