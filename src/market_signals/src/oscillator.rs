//! Stochastic %K/%D oscillator over a normalized series.
//!
//! For a lookback of `period` bars:
//!
//! ```text
//! %K[i] = (close[i] - lowest_low) / (highest_high - lowest_low) * 100
//! %D[i] = mean(%K[i - d_period + 1 ..= i])
//! ```
//!
//! where the extremes are taken over `points[i - period + 1 ..= i]`. Only the
//! current and preceding points contribute to a value. A window with no price
//! range (`highest_high == lowest_low`) yields `%K = 0`.

use serde::{Deserialize, Serialize};

use crate::{errors::ConfigError, models::data_point::DataPoint};

/// Window sizes for the oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OscillatorConfig {
    /// Lookback length for %K, in bars (current bar included).
    pub period: usize,
    /// Number of %K values averaged into %D.
    pub d_period: usize,
}

impl OscillatorConfig {
    pub const DEFAULT_PERIOD: usize = 14;
    pub const DEFAULT_D_PERIOD: usize = 3;

    /// Builds a validated configuration.
    pub fn new(period: usize, d_period: usize) -> Result<Self, ConfigError> {
        let config = Self { period, d_period };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period == 0 || self.d_period == 0 {
            return Err(ConfigError::InvalidWindow {
                period: self.period,
                d_period: self.d_period,
            });
        }
        Ok(())
    }

    /// Index of the first point that can carry a %K value.
    pub fn first_k_index(&self) -> usize {
        self.period.saturating_sub(1)
    }

    /// Index of the first point that can carry a %D value.
    ///
    /// Saturates at `usize::MAX - 2` for windows too large to ever fill.
    pub fn first_d_index(&self) -> usize {
        self.period.saturating_add(self.d_period).saturating_sub(2)
    }
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            period: Self::DEFAULT_PERIOD,
            d_period: Self::DEFAULT_D_PERIOD,
        }
    }
}

/// Computes %K and %D for every point, returning a new series.
///
/// The output has the same length and order as `points`; each point differs
/// from its input only in `k`/`d`. A series shorter than the warm-up simply
/// has no values. Fails only on a zero-sized window, before touching any point.
pub fn compute_oscillator(
    points: &[DataPoint],
    config: &OscillatorConfig,
) -> Result<Vec<DataPoint>, ConfigError> {
    config.validate()?;

    let k_line: Vec<Option<f64>> = (0..points.len())
        .map(|i| percent_k(points, i, config.period))
        .collect();

    let enriched = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let d = percent_d(&k_line, i, config);
            point.with_oscillator(k_line[i], d)
        })
        .collect();

    Ok(enriched)
}

fn percent_k(points: &[DataPoint], i: usize, period: usize) -> Option<f64> {
    let start = (i + 1).checked_sub(period)?;
    let window = &points[start..=i];
    let (lowest_low, highest_high) = window
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.low()), hi.max(p.high()))
        });

    if highest_high == lowest_low {
        return Some(0.0);
    }

    Some((points[i].close() - lowest_low) / (highest_high - lowest_low) * 100.0)
}

fn percent_d(k_line: &[Option<f64>], i: usize, config: &OscillatorConfig) -> Option<f64> {
    if i < config.first_d_index() {
        return None;
    }

    let start = (i + 1).checked_sub(config.d_period)?;
    let window = &k_line[start..=i];
    let defined: Vec<f64> = window.iter().flatten().copied().collect();
    if defined.len() < config.d_period {
        return None;
    }

    // Left fold from +0.0 so an all-zero window averages to +0.0.
    let sum = defined.iter().fold(0.0, |acc, k| acc + k);
    Some(sum / config.d_period as f64)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn bar(i: i64, high: f64, low: f64, close: f64) -> DataPoint {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::days(i);
        DataPoint::new(ts, close, high, low, close, 100.0, close)
    }

    fn rising(n: usize) -> Vec<DataPoint> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64;
                bar(i as i64, base + 2.0, base - 2.0, base + 1.0)
            })
            .collect()
    }

    #[test]
    fn default_windows_are_14_and_3() {
        let config = OscillatorConfig::default();
        assert_eq!((config.period, config.d_period), (14, 3));
        assert_eq!((config.first_k_index(), config.first_d_index()), (13, 15));
    }

    #[test]
    fn zero_window_is_rejected() {
        let points = rising(20);
        for (period, d_period) in [(0, 3), (14, 0), (0, 0)] {
            let err = compute_oscillator(&points, &OscillatorConfig { period, d_period }).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidWindow { .. }));
        }
        assert!(OscillatorConfig::new(0, 3).is_err());
    }

    #[test]
    fn sixteen_days_with_defaults() {
        let out = compute_oscillator(&rising(16), &OscillatorConfig::default()).unwrap();
        assert_eq!(out.len(), 16);

        let first_k = out.iter().position(|p| p.k().is_some());
        let first_d = out.iter().position(|p| p.d().is_some());
        assert_eq!(first_k, Some(13));
        assert_eq!(first_d, Some(15));
    }

    #[test]
    fn percent_k_matches_hand_computation() {
        let points = vec![
            bar(0, 10.0, 9.0, 9.5),
            bar(1, 11.0, 9.5, 10.5),
            bar(2, 12.0, 10.0, 11.0),
            bar(3, 11.5, 10.5, 11.0),
        ];
        let out = compute_oscillator(&points, &OscillatorConfig::new(3, 2).unwrap()).unwrap();

        // window [0..=2]: low 9, high 12, close 11 -> 2/3
        let k2 = out[2].k().unwrap();
        assert!((k2 - 200.0 / 3.0).abs() < 1e-12);
        // window [1..=3]: low 9.5, high 12, close 11 -> 1.5/2.5
        let k3 = out[3].k().unwrap();
        assert!((k3 - 60.0).abs() < 1e-12);

        assert_eq!(out[2].d(), None);
        let d3 = out[3].d().unwrap();
        assert!((d3 - (k2 + k3) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn flat_window_yields_zero() {
        let points: Vec<DataPoint> = (0..14).map(|i| bar(i, 100.0, 100.0, 100.0)).collect();
        let out = compute_oscillator(&points, &OscillatorConfig::default()).unwrap();
        assert_eq!(out[13].k(), Some(0.0));
        assert!(out[..13].iter().all(|p| p.k().is_none()));
    }

    #[test]
    fn flat_window_ignores_close() {
        // A close outside a zero-width window still gets the defined zero.
        let points = vec![bar(0, 50.0, 50.0, 55.0), bar(1, 50.0, 50.0, 45.0)];
        let out = compute_oscillator(&points, &OscillatorConfig::new(2, 1).unwrap()).unwrap();
        assert_eq!(out[1].k(), Some(0.0));
        assert_eq!(out[1].d(), Some(0.0));
    }

    #[test]
    fn short_series_has_no_values() {
        let out = compute_oscillator(&rising(5), &OscillatorConfig::default()).unwrap();
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|p| p.k().is_none() && p.d().is_none()));

        assert!(compute_oscillator(&[], &OscillatorConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn oversized_windows_leave_the_series_empty() {
        let points = rising(3);
        for (period, d_period) in [(usize::MAX, 3), (14, usize::MAX), (usize::MAX, usize::MAX)] {
            let config = OscillatorConfig { period, d_period };
            let out = compute_oscillator(&points, &config).unwrap();
            assert_eq!(out.len(), 3);
            assert!(out.iter().all(|p| p.k().is_none() && p.d().is_none()));
        }
        assert_eq!(
            OscillatorConfig { period: usize::MAX, d_period: usize::MAX }.first_d_index(),
            usize::MAX - 2
        );
    }

    #[test]
    fn period_of_one_uses_only_the_current_bar() {
        let points = vec![bar(0, 10.0, 8.0, 9.0), bar(1, 20.0, 10.0, 20.0)];
        let out = compute_oscillator(&points, &OscillatorConfig::new(1, 1).unwrap()).unwrap();
        assert_eq!(out[0].k(), Some(50.0));
        assert_eq!(out[0].d(), Some(50.0));
        assert_eq!(out[1].k(), Some(100.0));
    }

    #[test]
    fn input_points_are_not_modified() {
        let points = rising(20);
        let snapshot = points.clone();
        let out = compute_oscillator(&points, &OscillatorConfig::default()).unwrap();
        assert_eq!(points, snapshot);
        for (before, after) in points.iter().zip(&out) {
            assert_eq!(before.ohlc(), after.ohlc());
            assert_eq!(before.datetime(), after.datetime());
        }
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: OscillatorConfig = toml::from_str("period = 9").unwrap();
        assert_eq!(config, OscillatorConfig { period: 9, d_period: 3 });
        assert!(toml::from_str::<OscillatorConfig>("window = 9").is_err());
    }
}
