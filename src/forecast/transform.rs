//! Columnar to row-oriented conversion.

use crate::forecast::types::{HourlySeries, WeatherRecord};

/// Zip `time` and `temperature_2m` into records, stopping at the shorter array.
///
/// A `null` temperature is reported as `0.0`.
pub fn pair_hourly(series: HourlySeries) -> Vec<WeatherRecord> {
    series
        .time
        .into_iter()
        .zip(series.temperature_2m)
        .map(|(time, temperature)| WeatherRecord {
            time,
            temperature: temperature.unwrap_or_default(),
        })
        .collect()
}
