use crate::{Config, EngineError, RawSample, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod openweather;

/// Source of raw weather samples for a location.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, location: &str) -> Result<RawSample, EngineError>;

    /// Interval samples (typically 3-hourly) covering the next few days.
    async fn fetch_forecast(&self, location: &str) -> Result<Vec<RawSample>, EngineError>;
}

/// Construct the weather provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;
    config.validate()?;
    let settings = &config.provider;

    let provider = OpenWeatherProvider::with_urls(
        api_key.to_owned(),
        settings.current_url.clone(),
        settings.forecast_url.clone(),
    )
    .with_timeout(Duration::from_secs(settings.timeout_secs))?;

    Ok(Box::new(provider))
}
