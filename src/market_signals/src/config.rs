//! Settings: TOML file, environment overrides, validation.
//!
//! Layers, lowest to highest precedence:
//! 1. built-in defaults ([`OscillatorConfig::default`])
//! 2. a TOML settings file
//! 3. `MARKET_SIGNALS_PERIOD` / `MARKET_SIGNALS_D_PERIOD`
//! 4. explicit overrides from the caller (e.g. CLI flags)
//!
//! ```toml
//! [oscillator]
//! period = 14
//! d_period = 3
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use shared_utils::env::parse_env_var;

use crate::{errors::ConfigError, oscillator::OscillatorConfig};

/// Overrides [`OscillatorConfig::period`].
pub const PERIOD_ENV: &str = "MARKET_SIGNALS_PERIOD";
/// Overrides [`OscillatorConfig::d_period`].
pub const D_PERIOD_ENV: &str = "MARKET_SIGNALS_D_PERIOD";

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub oscillator: OscillatorConfig,
}

impl Settings {
    /// Applies the environment overrides in place. Unset or blank variables are ignored.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(period) = parse_env_var::<usize>(PERIOD_ENV)? {
            self.oscillator.period = period;
        }
        if let Some(d_period) = parse_env_var::<usize>(D_PERIOD_ENV)? {
            self.oscillator.d_period = d_period;
        }
        Ok(())
    }

    /// Applies caller overrides (typically CLI flags) in place.
    pub fn apply_overrides(&mut self, period: Option<usize>, d_period: Option<usize>) {
        if let Some(period) = period {
            self.oscillator.period = period;
        }
        if let Some(d_period) = d_period {
            self.oscillator.d_period = d_period;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.oscillator.validate()
    }

    /// Loads settings from an optional file, then applies environment overrides.
    ///
    /// The result is not validated yet so callers can layer their own overrides first.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => load_settings_path(path)?,
            None => Settings::default(),
        };
        settings.apply_env_overrides()?;
        Ok(settings)
    }
}

/// Parses settings from a TOML string. Missing keys take their defaults.
pub fn load_settings_str(toml_str: &str) -> Result<Settings, ConfigError> {
    Ok(toml::from_str(toml_str)?)
}

/// Reads and parses a TOML settings file.
pub fn load_settings_path(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::File {
        path: path.to_path_buf(),
        source,
    })?;
    load_settings_str(&text)
}
