//! Canonical in-memory representation of one enriched time-series point.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single normalized OHLCV point, plus the signals derived from it.
///
/// Points are immutable once built: the geometry fields (`ohlc`, `range`) are
/// fixed at construction, and the oscillator stage produces new points via
/// [`DataPoint::with_oscillator`] rather than patching existing ones.
///
/// Serializes with the field names the charting front end expects
/// (`pBuy`, `pSell`, `priceDiff`, `return`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    datetime: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    p_buy: f64,
    p_sell: f64,
    price_diff: f64,
    #[serde(rename = "return")]
    period_return: f64,
    ohlc: (f64, f64, f64, f64),
    range: (f64, f64),
    k: Option<f64>,
    d: Option<f64>,
}

impl DataPoint {
    /// Builds a point from its required fields.
    ///
    /// The sell-side fields start at zero (see [`DataPoint::with_sell_side`])
    /// and the oscillator values start absent.
    pub fn new(
        datetime: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        p_buy: f64,
    ) -> Self {
        Self {
            datetime,
            open,
            high,
            low,
            close,
            volume,
            p_buy,
            p_sell: 0.0,
            price_diff: 0.0,
            period_return: 0.0,
            ohlc: (open, high, low, close),
            range: (low, high),
            k: None,
            d: None,
        }
    }

    /// Sets the sell price, the buy/sell price difference and the return.
    pub fn with_sell_side(mut self, p_sell: f64, price_diff: f64, period_return: f64) -> Self {
        self.p_sell = p_sell;
        self.price_diff = price_diff;
        self.period_return = period_return;
        self
    }

    /// Returns a copy of this point carrying the given %K and %D values.
    pub fn with_oscillator(&self, k: Option<f64>, d: Option<f64>) -> Self {
        Self {
            k,
            d,
            ..self.clone()
        }
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }

    pub fn open(&self) -> f64 {
        self.open
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn close(&self) -> f64 {
        self.close
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Buy-side indicator price.
    pub fn p_buy(&self) -> f64 {
        self.p_buy
    }

    pub fn p_sell(&self) -> f64 {
        self.p_sell
    }

    pub fn price_diff(&self) -> f64 {
        self.price_diff
    }

    /// Return of the holding period ending at this point, as a fraction.
    pub fn period_return(&self) -> f64 {
        self.period_return
    }

    /// `(open, high, low, close)`, ready for a candlestick renderer.
    pub fn ohlc(&self) -> (f64, f64, f64, f64) {
        self.ohlc
    }

    /// `(low, high)`, ready for a range-bar renderer.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Stochastic %K, in `[0, 100]`, once the lookback window is full.
    pub fn k(&self) -> Option<f64> {
        self.k
    }

    /// Stochastic %D, once enough %K values exist to smooth.
    pub fn d(&self) -> Option<f64> {
        self.d
    }
}
