//! Render-ready snapshot of the widget, consumed by the presentation layer.
//!
//! Dates, tile times and sunrise/sunset are wall-clock values in the
//! forecast city's time zone.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    clock,
    fetcher::FetchState,
    model::{ForecastModel, Reading, Unit},
    selection::Selection,
    temperature::format_temperature,
};

pub const FORECAST_DAY_LABEL: &str = "Forecast Day";

/// Summary block for the selected reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub city_name: String,
    /// `Local Time: hh:mm AM` for today, [`FORECAST_DAY_LABEL`] otherwise.
    pub time_label: String,
    pub date_label: String,
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub visibility_km: f64,
    pub pressure_hpa: u32,
    pub sunrise: String,
    pub sunset: String,
    pub icon_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyTile {
    pub timestamp_epoch: i64,
    pub time_label: String,
    pub temperature: i64,
    pub icon_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTile {
    pub timestamp_epoch: i64,
    pub weekday: String,
    pub temperature: i64,
    pub icon_id: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub loading: bool,
    pub error: Option<String>,
    pub unit_symbol: char,
    pub current: Option<CurrentConditions>,
    pub hourly: Vec<HourlyTile>,
    pub daily: Vec<DailyTile>,
}

impl ViewModel {
    /// Formats the widget state as of `now`.
    pub fn assemble(
        state: &FetchState,
        selection: &Selection,
        unit: Unit,
        now: DateTime<Utc>,
    ) -> Self {
        let model = state.model();

        let current = model.and_then(|model| {
            selection
                .selected_reading(model)
                .map(|reading| current_conditions(model, reading, selection, unit, now))
        });

        let hourly = match model {
            Some(model) => selection
                .hourly_slice(Some(model))
                .into_iter()
                .map(|r| HourlyTile {
                    timestamp_epoch: r.timestamp_epoch,
                    time_label: clock::clock_label(r.timestamp_epoch, model.timezone_offset_seconds),
                    temperature: format_temperature(r.temperature_c, unit),
                    icon_id: r.weather_icon_id.clone(),
                })
                .collect(),
            None => Vec::new(),
        };

        let daily = model
            .map(|model| {
                model
                    .daily_series()
                    .map(|r| DailyTile {
                        timestamp_epoch: r.timestamp_epoch,
                        weekday: clock::weekday_label(r.timestamp_epoch, model.timezone_offset_seconds),
                        temperature: format_temperature(r.temperature_c, unit),
                        icon_id: r.weather_icon_id.clone(),
                        selected: selection.is_selected(r),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            loading: state.is_loading(),
            error: state.error().map(str::to_owned),
            unit_symbol: unit.symbol(),
            current,
            hourly,
            daily,
        }
    }
}

fn current_conditions(
    model: &ForecastModel,
    reading: &Reading,
    selection: &Selection,
    unit: Unit,
    now: DateTime<Utc>,
) -> CurrentConditions {
    let offset = model.timezone_offset_seconds;

    let time_label = if selection.is_today(model) {
        format!("Local Time: {}", clock::city_time(now, offset))
    } else {
        FORECAST_DAY_LABEL.to_string()
    };

    CurrentConditions {
        city_name: model.city_name.clone(),
        time_label,
        date_label: clock::date_label(reading.timestamp_epoch, offset),
        temperature: format_temperature(reading.temperature_c, unit),
        feels_like: format_temperature(reading.feels_like_c, unit),
        humidity_pct: reading.humidity_pct,
        wind_speed_mps: reading.wind_speed_mps,
        visibility_km: f64::from(reading.visibility_meters) / 1000.0,
        pressure_hpa: reading.pressure_hpa,
        sunrise: clock::clock_label(model.sunrise_epoch, offset),
        sunset: clock::clock_label(model.sunset_epoch, offset),
        icon_id: reading.weather_icon_id.clone(),
    }
}
