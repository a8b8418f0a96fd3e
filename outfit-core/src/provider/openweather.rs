use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{error::EngineError, model::RawSample};

use super::WeatherProvider;

pub const DEFAULT_CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    current_url: String,
    forecast_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_urls(api_key, DEFAULT_CURRENT_URL.to_string(), DEFAULT_FORECAST_URL.to_string())
    }

    pub fn with_urls(api_key: String, current_url: String, forecast_url: String) -> Self {
        Self { api_key, current_url, forecast_url, http: Client::new() }
    }

    /// Use a client whose requests give up after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, EngineError> {
        self.http = Client::builder().timeout(timeout).build().map_err(|e| {
            EngineError::ProviderUnavailable {
                status: None,
                message: format!("Failed to build HTTP client: {e}"),
            }
        })?;
        Ok(self)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        location: &str,
        what: &str,
    ) -> Result<T, EngineError> {
        let res = self
            .http
            .get(url)
            .query(&[("q", location), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|e| EngineError::ProviderUnavailable {
                status: e.status().map(|s| s.as_u16()),
                message: format!("Failed to send request to OpenWeather ({what}): {e}"),
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| EngineError::ProviderUnavailable {
            status: Some(status.as_u16()),
            message: format!("Failed to read OpenWeather {what} response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(EngineError::ProviderUnavailable {
                status: Some(status.as_u16()),
                message: format!("OpenWeather {what} request failed: {}", truncate_body(&body)),
            });
        }

        debug!(what, %status, bytes = body.len(), "OpenWeather response received");
        parse_body(&body, what)
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

/// Precipitation volume over the last 1 or 3 hours.
#[derive(Debug, Default, Deserialize)]
struct OwPrecipitation {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

impl OwPrecipitation {
    fn volume(&self) -> Option<f64> {
        self.one_hour.or(self.three_hours)
    }
}

/// Shape shared by the current-weather response and each forecast list entry.
#[derive(Debug, Deserialize)]
struct OwEntry {
    dt: Option<i64>,
    #[serde(default)]
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    rain: Option<OwPrecipitation>,
    snow: Option<OwPrecipitation>,
}

impl From<OwEntry> for RawSample {
    fn from(entry: OwEntry) -> Self {
        RawSample {
            temperature: entry.main.temp,
            feels_like: entry.main.feels_like,
            humidity: entry.main.humidity,
            wind_speed: entry.wind.speed,
            condition: entry.weather.into_iter().next().map(|w| w.main),
            rain_mm: entry.rain.and_then(|p| p.volume()),
            snow_mm: entry.snow.and_then(|p| p.volume()),
            timestamp: entry.dt,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwEntry>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, location: &str) -> Result<RawSample, EngineError> {
        let entry: OwEntry = self.get_json(&self.current_url, location, "current weather").await?;
        Ok(entry.into())
    }

    async fn fetch_forecast(&self, location: &str) -> Result<Vec<RawSample>, EngineError> {
        let parsed: OwForecastResponse =
            self.get_json(&self.forecast_url, location, "5-day forecast").await?;
        Ok(parsed.list.into_iter().map(RawSample::from).collect())
    }
}

fn parse_body<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, EngineError> {
    serde_json::from_str(body).map_err(|e| {
        EngineError::invalid("body", format!("could not parse OpenWeather {what} JSON: {e}"))
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
