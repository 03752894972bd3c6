//! Non-fatal checks on a normalized series.
//!
//! The pipeline trusts its source: rows are expected in chronological order
//! with sane bars, but none of that is enforced. These checks only report
//! where the expectation does not hold, so callers can log it. Oscillator
//! values computed over an unsorted series are meaningless, not erroneous.

use std::fmt;

use crate::models::data_point::DataPoint;

/// A precondition the series does not meet, tagged with the offending row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesIssue {
    /// Timestamp earlier than the previous row's.
    OutOfOrder { row: usize },
    /// Timestamp equal to the previous row's.
    DuplicateTimestamp { row: usize },
    /// `high < low`.
    InvertedRange { row: usize },
    NegativeVolume { row: usize },
}

impl SeriesIssue {
    pub fn row(&self) -> usize {
        match *self {
            SeriesIssue::OutOfOrder { row }
            | SeriesIssue::DuplicateTimestamp { row }
            | SeriesIssue::InvertedRange { row }
            | SeriesIssue::NegativeVolume { row } => row,
        }
    }
}

impl fmt::Display for SeriesIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesIssue::OutOfOrder { row } => {
                write!(f, "row {row}: timestamp precedes the previous row")
            }
            SeriesIssue::DuplicateTimestamp { row } => {
                write!(f, "row {row}: timestamp duplicates the previous row")
            }
            SeriesIssue::InvertedRange { row } => write!(f, "row {row}: high is below low"),
            SeriesIssue::NegativeVolume { row } => write!(f, "row {row}: negative volume"),
        }
    }
}

/// Lists every issue found, in row order.
pub fn inspect_series(points: &[DataPoint]) -> Vec<SeriesIssue> {
    let mut issues = Vec::new();

    for (row, point) in points.iter().enumerate() {
        if let Some(prev) = row.checked_sub(1).map(|r| &points[r]) {
            if point.datetime() < prev.datetime() {
                issues.push(SeriesIssue::OutOfOrder { row });
            } else if point.datetime() == prev.datetime() {
                issues.push(SeriesIssue::DuplicateTimestamp { row });
            }
        }
        if point.high() < point.low() {
            issues.push(SeriesIssue::InvertedRange { row });
        }
        if point.volume() < 0.0 {
            issues.push(SeriesIssue::NegativeVolume { row });
        }
    }

    issues
}
