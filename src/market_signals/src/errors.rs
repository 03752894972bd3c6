use std::path::PathBuf;

use chrono::NaiveDate;
use shared_utils::env::EnvError;
use thiserror::Error;

/// A raw row could not be turned into a [`DataPoint`](crate::models::data_point::DataPoint).
///
/// `row` is the 0-based index of the offending row in the input batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The `Datetime` field is missing or not a recognizable date/time.
    #[error("row {row}: invalid datetime")]
    InvalidDatetime { row: usize },

    /// A required numeric field is missing, or a numeric field holds a non-numeric value.
    #[error("row {row}: invalid numeric value in field `{field}`")]
    InvalidNumeric { row: usize, field: &'static str },
}

impl ParseError {
    /// Index of the row that failed.
    pub fn row(&self) -> usize {
        match self {
            ParseError::InvalidDatetime { row } | ParseError::InvalidNumeric { row, .. } => *row,
        }
    }
}

/// Errors related to pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `period` or `d_period` is zero.
    #[error("invalid oscillator window: period={period}, d_period={d_period} (both must be at least 1)")]
    InvalidWindow { period: usize, d_period: usize },

    /// The start of a date range lies after its end.
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// The settings file could not be read.
    #[error("failed to read settings file {}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`Settings`](crate::config::Settings).
    #[error("failed to parse settings TOML")]
    Toml(#[from] toml::de::Error),

    /// An environment override is present but malformed.
    #[error(transparent)]
    Env(#[from] EnvError),
}

/// The unified error type for the `market_signals` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A row was rejected during normalization.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Invalid window sizes, date ranges or settings.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The delimited input could not be read or the CSV output could not be written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A generic I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// JSON serialization of the output failed.
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_messages_name_row_and_field() {
        let err = ParseError::InvalidNumeric {
            row: 17,
            field: "Close",
        };
        assert_eq!(err.to_string(), "row 17: invalid numeric value in field `Close`");
        assert_eq!(err.row(), 17);

        let err = ParseError::InvalidDatetime { row: 3 };
        assert_eq!(err.to_string(), "row 3: invalid datetime");
        assert_eq!(err.row(), 3);
    }

    #[test]
    fn crate_error_is_transparent_over_parse_errors() {
        let err: Error = ParseError::InvalidDatetime { row: 0 }.into();
        assert_eq!(err.to_string(), "row 0: invalid datetime");
    }
}
