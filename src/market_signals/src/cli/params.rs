use std::path::Path;

use crate::{
    config::Settings,
    errors::ConfigError,
    models::{data_point::DataPoint, date_range::DateRange},
};

use super::commands::InputArgs;

/// Merges file, environment and flag settings, then validates the result.
pub fn resolve_settings(config: Option<&Path>, args: &InputArgs) -> Result<Settings, ConfigError> {
    let mut settings = Settings::load(config)?;
    settings.apply_overrides(args.period, args.d_period);
    settings.validate()?;
    Ok(settings)
}

/// Builds the output date filter from `--start`/`--end`.
///
/// A missing bound falls back to the series' own first or last date. Returns
/// `None` when neither flag is given, or when the series is empty and a bound
/// cannot be filled in.
pub fn resolve_range(
    args: &InputArgs,
    points: &[DataPoint],
) -> Result<Option<DateRange>, ConfigError> {
    if args.start.is_none() && args.end.is_none() {
        return Ok(None);
    }

    let covering = DateRange::covering(points);
    let start = args.start.or(covering.map(|r| r.start()));
    let end = args.end.or(covering.map(|r| r.end()));

    match (start, end) {
        (Some(start), Some(end)) => DateRange::new(start, end).map(Some),
        _ => Ok(None),
    }
}
