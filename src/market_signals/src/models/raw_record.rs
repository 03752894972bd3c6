//! Loosely typed input rows, as handed over by a tabular source.
//!
//! A [`RawRecord`] maps column names to [`RawValue`]s and preserves the column
//! order of its source. Nothing here enforces a schema; that is the job of the
//! [`normalizer`](crate::normalizer).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column names understood by the normalizer. Matching is case-sensitive.
pub mod columns {
    pub const DATETIME: &str = "Datetime";
    pub const OPEN: &str = "Open";
    pub const HIGH: &str = "High";
    pub const LOW: &str = "Low";
    pub const CLOSE: &str = "Close";
    pub const VOLUME: &str = "Volume";
    pub const P_BUY: &str = "P_buy";
    pub const P_SELL: &str = "P_sell";
    pub const PRICE_DIFF: &str = "price_diff";
    pub const RETURN: &str = "return";
}

/// A single untyped cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Empty cell.
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Infers the type of a delimited-text cell.
    ///
    /// Empty (after trimming) becomes [`RawValue::Null`], `true`/`false` in any
    /// case become [`RawValue::Bool`], anything that parses as a finite `f64`
    /// becomes [`RawValue::Number`], and everything else stays text.
    pub fn infer(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.is_empty() {
            return RawValue::Null;
        }
        if cell.eq_ignore_ascii_case("true") {
            return RawValue::Bool(true);
        }
        if cell.eq_ignore_ascii_case("false") {
            return RawValue::Bool(false);
        }
        match cell.parse::<f64>() {
            Ok(n) if n.is_finite() => RawValue::Number(n),
            _ => RawValue::Text(cell.to_string()),
        }
    }

    /// Coerces the value to a finite real number, if possible.
    ///
    /// Text is trimmed before parsing. Booleans, nulls and non-finite numbers
    /// are not coercible.
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
            RawValue::Null | RawValue::Bool(_) => return None,
        };
        n.is_finite().then_some(n)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// Outcome of looking up a numeric field in a [`RawRecord`].
///
/// Keeps "not there" apart from "there but unusable", so optional columns can
/// default the first case and reject the second. Only an absent key is
/// missing; a key holding null or `false` is judged by its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// The key is absent.
    Missing,
    /// The key is present but its value is not a finite number. Null counts here.
    Invalid,
    Valid(f64),
}

/// An untyped row: column name to cell value, in source column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(IndexMap<String, RawValue>);

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cell, returning the record for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a cell, returning the previous value of that column if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Option<RawValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Looks up `key` as a numeric field.
    pub fn field(&self, key: &str) -> FieldValue {
        match self.0.get(key) {
            None => FieldValue::Missing,
            Some(value) => value.as_f64().map_or(FieldValue::Invalid, FieldValue::Valid),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
