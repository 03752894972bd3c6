use std::str::FromStr;

use thiserror::Error;

/// Errors raised while reading configuration from the process environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// An environment variable required by the application is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The variable is set but its value could not be parsed into the expected type.
    #[error("Invalid value for environment variable {name}: {value:?}")]
    InvalidValue { name: String, value: String },
}

/// Reads an environment variable, returning a structured error if it's missing.
///
/// This is a thin wrapper around `std::env::var` that provides a more
/// ergonomic and specific error type for missing variables.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, EnvError> {
    std::env::var(name).map_err(|_| EnvError::MissingEnvVar(name.to_string()))
}

/// Reads and parses an optional environment variable.
///
/// Returns `Ok(None)` when the variable is unset or blank, and
/// [`EnvError::InvalidValue`] when it is set but `T::from_str` rejects it.
pub fn parse_env_var<T: FromStr>(name: &str) -> Result<Option<T>, EnvError> {
    let raw = match get_env_var(name) {
        Ok(raw) => raw,
        Err(EnvError::MissingEnvVar(_)) => return Ok(None),
        Err(e) => return Err(e),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| EnvError::InvalidValue {
            name: name.to_string(),
            value: raw.clone(),
        })
}
