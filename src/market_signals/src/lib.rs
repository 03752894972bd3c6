//! Ingestion of OHLCV tables and enrichment with a stochastic %K/%D oscillator.
//!
//! The core is two pure transforms applied in order:
//! [`normalizer::normalize`] turns loosely typed rows into [`DataPoint`]s, and
//! [`oscillator::compute_oscillator`] returns a new series carrying `k`/`d`.
//! [`pipeline::process`] chains them with logging and series diagnostics.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod io;
pub mod models;
pub mod normalizer;
pub mod oscillator;
pub mod pipeline;
pub mod validation;

pub use errors::{ConfigError, Error, ParseError};
pub use models::{
    data_point::DataPoint,
    date_range::{DateRange, filter_by_range},
    raw_record::{FieldValue, RawRecord, RawValue},
};
pub use normalizer::normalize;
pub use oscillator::{OscillatorConfig, compute_oscillator};
pub use pipeline::process;
