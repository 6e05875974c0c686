use crate::{Config, error::FetchError, model::ForecastModel, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of forecast data for a city name.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self, city: &str) -> Result<ForecastModel, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let api_key = config.api_key()?;
    let provider = OpenWeatherProvider::new(api_key).with_base_url(config.base_url());

    Ok(Box::new(provider))
}
