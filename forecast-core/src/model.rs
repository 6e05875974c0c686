use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Marker carried by the provider's timestamp text for the midday sample.
const MIDDAY_SLOT: &str = "12:00:00";

/// Display unit for temperatures. Readings are always stored in Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub fn symbol(&self) -> char {
        match self {
            Unit::Celsius => 'C',
            Unit::Fahrenheit => 'F',
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Unit::Celsius => Unit::Fahrenheit,
            Unit::Fahrenheit => Unit::Celsius,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "°{}", self.symbol())
    }
}

/// One 3-hour sample of the provider's forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp_epoch: i64,
    /// Provider timestamp text, e.g. `2026-10-17 12:00:00` (UTC).
    pub timestamp_text: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub visibility_meters: u32,
    pub pressure_hpa: u32,
    pub weather_icon_id: String,
}

impl Reading {
    /// True when the provider marks this reading as the day's midday slot.
    pub fn is_midday_sample(&self) -> bool {
        self.timestamp_text
            .split_once(' ')
            .is_some_and(|(_, time)| time == MIDDAY_SLOT)
    }
}

/// Forecast for one city, built once per successful fetch and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastModel {
    pub city_name: String,
    pub timezone_offset_seconds: i32,
    pub sunrise_epoch: i64,
    pub sunset_epoch: i64,
    full_series: Vec<Reading>,
    /// Indices into `full_series`, ascending.
    daily_indices: Vec<usize>,
}

impl ForecastModel {
    /// Builds the model from the provider-ordered series.
    ///
    /// The daily series is every midday-marked reading, in order. Dates
    /// without a midday sample (partial days at either end of the range)
    /// simply have no daily entry.
    pub fn new(
        city_name: String,
        timezone_offset_seconds: i32,
        sunrise_epoch: i64,
        sunset_epoch: i64,
        full_series: Vec<Reading>,
    ) -> Result<Self, FetchError> {
        if full_series.is_empty() {
            return Err(FetchError::EmptyForecast);
        }

        let daily_indices = full_series
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_midday_sample())
            .map(|(i, _)| i)
            .collect();

        Ok(Self {
            city_name,
            timezone_offset_seconds,
            sunrise_epoch,
            sunset_epoch,
            full_series,
            daily_indices,
        })
    }

    pub fn full_series(&self) -> &[Reading] {
        &self.full_series
    }

    /// The first reading of the series ("now").
    pub fn first(&self) -> &Reading {
        // Non-empty by construction.
        &self.full_series[0]
    }

    pub fn daily_series(&self) -> impl Iterator<Item = &Reading> + '_ {
        self.daily_indices.iter().map(|&i| &self.full_series[i])
    }

    pub fn daily_len(&self) -> usize {
        self.daily_indices.len()
    }

    pub fn daily_reading(&self, index: usize) -> Option<&Reading> {
        self.daily_indices.get(index).map(|&i| &self.full_series[i])
    }

    /// Looks up a reading of the full series by its timestamp.
    pub fn reading_at(&self, timestamp_epoch: i64) -> Option<&Reading> {
        self.full_series
            .iter()
            .find(|r| r.timestamp_epoch == timestamp_epoch)
    }

    pub fn is_daily(&self, timestamp_epoch: i64) -> bool {
        self.daily_series()
            .any(|r| r.timestamp_epoch == timestamp_epoch)
    }
}
