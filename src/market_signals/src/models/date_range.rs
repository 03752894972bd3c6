//! Inclusive calendar-date interval used to window an already-enriched series.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors::ConfigError, models::data_point::DataPoint};

/// Inclusive `start..=end` interval of UTC calendar dates.
///
/// `start` covers its day from 00:00:00 and `end` covers its day up to the
/// last instant before midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

/// Wire form of [`DateRange`]; deserialized ranges go through [`DateRange::new`].
#[derive(Deserialize)]
struct UncheckedDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<UncheckedDateRange> for DateRange {
    type Error = ConfigError;

    fn try_from(raw: UncheckedDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The range spanning the first and last point's dates, or `None` for an empty series.
    ///
    /// Assumes chronological order, like the rest of the pipeline.
    pub fn covering(points: &[DataPoint]) -> Option<Self> {
        let first = points.first()?.datetime().date_naive();
        let last = points.last()?.datetime().date_naive();
        Some(Self {
            start: first.min(last),
            end: first.max(last),
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let day = instant.date_naive();
        self.start <= day && day <= self.end
    }
}

/// Keeps the points whose timestamp falls inside `range`, in their original order.
///
/// Indicator values are carried over as computed on the full series.
pub fn filter_by_range(points: &[DataPoint], range: &DateRange) -> Vec<DataPoint> {
    points
        .iter()
        .filter(|p| range.contains(p.datetime()))
        .cloned()
        .collect()
}
