use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::FetchError,
    model::{ForecastModel, Reading},
};

use super::ForecastProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const FORECAST_PATH: &str = "/data/2.5/forecast";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the provider at another host, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch(&self, city: &str) -> Result<ForecastModel, FetchError> {
        let url = format!("{}{}", self.base_url, FORECAST_PATH);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            tracing::debug!(%status, city, "OpenWeather forecast request rejected");
            return Err(FetchError::NotFound);
        }

        let body = res.text().await?;
        let parsed: OwForecastResponse = serde_json::from_str(&body)?;

        parsed.into_model()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    timezone: i32,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwMain,
    wind: OwWind,
    #[serde(default)]
    visibility: u32,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl OwForecastEntry {
    fn into_reading(self) -> Reading {
        let weather_icon_id = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.icon)
            .unwrap_or_default();

        Reading {
            timestamp_epoch: self.dt,
            timestamp_text: self.dt_txt,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            wind_speed_mps: self.wind.speed,
            visibility_meters: self.visibility,
            pressure_hpa: self.main.pressure,
            weather_icon_id,
        }
    }
}

impl OwForecastResponse {
    fn into_model(self) -> Result<ForecastModel, FetchError> {
        let readings = self.list.into_iter().map(OwForecastEntry::into_reading).collect();

        ForecastModel::new(
            self.city.name,
            self.city.timezone,
            self.city.sunrise,
            self.city.sunset,
            readings,
        )
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    async fn fetch_forecast(&self, city: &str) -> Result<ForecastModel, FetchError> {
        self.fetch(city).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use super::*;

    fn entry(dt: i64, dt_txt: &str, temp: f64) -> serde_json::Value {
        json!({
            "dt": dt,
            "dt_txt": dt_txt,
            "main": { "temp": temp, "feels_like": temp - 2.0, "humidity": 71, "pressure": 1009 },
            "wind": { "speed": 4.1 },
            "visibility": 10000,
            "weather": [ { "id": 800, "main": "Clear", "icon": "01d" } ]
        })
    }

    fn forecast_body() -> serde_json::Value {
        json!({
            "cod": "200",
            "city": { "name": "Paris", "country": "FR", "timezone": 7200, "sunrise": 1792217000, "sunset": 1792256000 },
            "list": [
                entry(1792227600, "2026-10-17 09:00:00", 11.2),
                entry(1792238400, "2026-10-17 12:00:00", 14.8),
                entry(1792249200, "2026-10-17 15:00:00", 15.3),
                entry(1792324800, "2026-10-18 12:00:00", 13.0)
            ]
        })
    }

    #[tokio::test]
    async fn parses_forecast_into_model() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .and(query_param("q", "Paris"))
            .and(query_param("appid", "KEY"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(server.uri());
        let model = provider.fetch_forecast("Paris").await.unwrap();

        assert_eq!(model.city_name, "Paris");
        assert_eq!(model.timezone_offset_seconds, 7200);
        assert_eq!(model.sunrise_epoch, 1792217000);
        assert_eq!(model.full_series().len(), 4);
        assert_eq!(model.daily_len(), 2);

        let first = model.first();
        assert_eq!(first.timestamp_epoch, 1792227600);
        assert_eq!(first.humidity_pct, 71);
        assert_eq!(first.pressure_hpa, 1009);
        assert_eq!(first.visibility_meters, 10000);
        assert_eq!(first.weather_icon_id, "01d");
        assert!((first.feels_like_c - 9.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn non_success_status_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "cod": "404", "message": "city not found" })),
            )
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(server.uri());
        let err = provider.fetch_forecast("Zzyx").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "City not found");
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(server.uri());
        let err = provider.fetch_forecast("Paris").await.unwrap_err();

        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn empty_list_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "city": { "name": "Nowhere", "timezone": 0, "sunrise": 0, "sunset": 0 },
                "list": []
            })))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(server.uri());
        let err = provider.fetch_forecast("Nowhere").await.unwrap_err();

        assert!(matches!(err, FetchError::EmptyForecast));
    }

    #[test]
    fn missing_optional_fields_default() {
        let raw = json!({
            "dt": 1, "dt_txt": "1970-01-01 00:00:01",
            "main": { "temp": 1.0, "feels_like": 1.0, "humidity": 1, "pressure": 1000 },
            "wind": { "speed": 0.0 }
        });
        let entry: OwForecastEntry = serde_json::from_value(raw).unwrap();
        let reading = entry.into_reading();

        assert_eq!(reading.visibility_meters, 0);
        assert_eq!(reading.weather_icon_id, "");
    }
}
