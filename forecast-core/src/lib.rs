//! Core library for the `forecast` weather widget.
//!
//! This crate defines:
//! - The forecast model derived from the provider's 3-hour series
//! - Debounced, cancelable fetching with stale-result suppression
//! - Day selection and the hourly slice for the selected day
//! - Temperature and local-time formatting, assembled into a view model
//! - Configuration & credentials handling
//!
//! It is used by `forecast-cli`, but any front end can drive a
//! [`ForecastWidget`] and render its [`ViewModel`].

pub mod clock;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod provider;
pub mod selection;
pub mod temperature;
pub mod view;
pub mod widget;

pub use config::Config;
pub use error::FetchError;
pub use fetcher::{FetchState, ForecastFetcher, Transition};
pub use model::{ForecastModel, Reading, Unit};
pub use provider::{ForecastProvider, openweather::OpenWeatherProvider};
pub use selection::{Selection, SelectionError};
pub use temperature::format_temperature;
pub use view::{CurrentConditions, DailyTile, HourlyTile, ViewModel};
pub use widget::ForecastWidget;
