//! End-to-end run: raw rows -> normalized series -> enriched series.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::{
    errors::Error,
    io::csv::read_records_path,
    models::{data_point::DataPoint, raw_record::RawRecord},
    normalizer::normalize,
    oscillator::{OscillatorConfig, compute_oscillator},
    validation::inspect_series,
};

/// Normalizes `rows` and computes the oscillator over them.
///
/// The window configuration is checked before any row is parsed. Series
/// precondition violations (see [`crate::validation`]) are logged and do not
/// stop the run; malformed rows do.
pub fn process(rows: &[RawRecord], config: &OscillatorConfig) -> Result<Vec<DataPoint>, Error> {
    let span = info_span!(
        "pipeline",
        rows = rows.len(),
        period = config.period,
        d_period = config.d_period
    );
    let _guard = span.enter();

    config.validate()?;

    let points = normalize(rows)?;
    debug!(points = points.len(), "normalized records");

    for issue in inspect_series(&points) {
        warn!(row = issue.row(), %issue, "series precondition not met");
    }

    let enriched = compute_oscillator(&points, config)?;
    let summary = summarize(&enriched);
    info!(
        k_defined = summary.k_defined,
        d_defined = summary.d_defined,
        "computed stochastic oscillator"
    );

    Ok(enriched)
}

/// Reads a CSV file and runs [`process`] on its rows.
pub fn process_path(
    path: impl AsRef<Path>,
    config: &OscillatorConfig,
) -> Result<Vec<DataPoint>, Error> {
    let rows = read_records_path(path)?;
    process(&rows, config)
}

/// Headline figures for an enriched series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub rows: usize,
    pub first: Option<DateTime<Utc>>,
    pub last: Option<DateTime<Utc>>,
    /// Number of points carrying a %K value.
    pub k_defined: usize,
    /// Number of points carrying a %D value.
    pub d_defined: usize,
    pub last_k: Option<f64>,
    pub last_d: Option<f64>,
}

pub fn summarize(points: &[DataPoint]) -> SeriesSummary {
    SeriesSummary {
        rows: points.len(),
        first: points.first().map(DataPoint::datetime),
        last: points.last().map(DataPoint::datetime),
        k_defined: points.iter().filter(|p| p.k().is_some()).count(),
        d_defined: points.iter().filter(|p| p.d().is_some()).count(),
        last_k: points.last().and_then(DataPoint::k),
        last_d: points.last().and_then(DataPoint::d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ConfigError, ParseError};

    fn row(day: u32, close: f64) -> RawRecord {
        RawRecord::new()
            .with("Datetime", format!("2025-01-{day:02}"))
            .with("Open", close)
            .with("High", close + 1.0)
            .with("Low", close - 1.0)
            .with("Close", close)
            .with("Volume", 500.0)
            .with("P_buy", close)
    }

    #[test]
    fn runs_both_stages() {
        let rows: Vec<RawRecord> = (1..=16).map(|d| row(d, 100.0 + d as f64)).collect();
        let out = process(&rows, &OscillatorConfig::default()).unwrap();

        let summary = summarize(&out);
        assert_eq!(summary.rows, 16);
        assert_eq!(summary.k_defined, 3);
        assert_eq!(summary.d_defined, 1);
        assert!(summary.last_d.is_some());
    }

    #[test]
    fn window_is_checked_before_rows() {
        let rows = vec![RawRecord::new().with("Datetime", "garbage")];
        let err = process(&rows, &OscillatorConfig { period: 0, d_period: 3 }).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidWindow { .. })));
    }

    #[test]
    fn bad_row_aborts_the_run() {
        let mut rows: Vec<RawRecord> = (1..=5).map(|d| row(d, 10.0)).collect();
        rows[3] = rows[3].clone().with("Close", "");
        let err = process(&rows, &OscillatorConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::InvalidNumeric { row: 3, field: "Close" })
        ));
    }

    #[test]
    fn unsorted_input_is_processed_as_given() {
        let rows = vec![row(3, 10.0), row(1, 11.0), row(2, 12.0)];
        let out = process(&rows, &OscillatorConfig::new(2, 1).unwrap()).unwrap();
        let closes: Vec<f64> = out.iter().map(DataPoint::close).collect();
        assert_eq!(closes, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn summary_of_empty_series() {
        let summary = summarize(&[]);
        assert_eq!(summary.rows, 0);
        assert_eq!((summary.first, summary.last), (None, None));
        assert_eq!((summary.last_k, summary.last_d), (None, None));
    }
}
