//! Wire types for the forecast API and the records served to clients.

use serde::{Deserialize, Serialize};

/// One hourly sample as returned by `/api/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Timestamp exactly as the upstream formats it (e.g. `2024-01-01T00:00`).
    pub time: String,
    #[serde(rename = "temperature_2m")]
    pub temperature: f64,
}

/// Top-level forecast response. Only `hourly` is consumed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastPayload {
    #[serde(default)]
    pub hourly: HourlySeries,
}

/// Parallel arrays of timestamps and temperatures.
///
/// The arrays are not guaranteed to be the same length. Temperatures may be
/// `null` for hours the model has no value for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
}
